use crate::preset::Preset;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompressRequest {
    pub input: PathBuf,
    pub output: PathBuf,
    pub preset: Preset,
    pub grayscale: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct EngineDiag {
    pub executable: String,
    pub version: Option<String>,
    pub ok: bool,
    pub error: Option<String>,
}
