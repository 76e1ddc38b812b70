use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CompressError {
    #[error("invalid path for input PDF file: {} ({reason})", .path.display())]
    InvalidInputPath { path: PathBuf, reason: String },

    #[error("input file is not a .{expected} file: {}", .path.display())]
    WrongExtension { path: PathBuf, expected: String },

    #[error("compression preset must be between 0 and 4, got {0}")]
    InvalidPreset(i64),

    #[error("engine executable not found; searched: {}", join_paths(.searched))]
    EngineNotFound { searched: Vec<PathBuf> },

    #[error("failed to start engine {}", .exe.display())]
    EngineSpawn {
        exe: PathBuf,
        source: std::io::Error,
    },

    #[error("engine exited with {status}: {stderr}")]
    EngineFailed { status: String, stderr: String },

    #[error("engine exceeded timeout of {secs}s; stderr: {stderr}")]
    EngineTimeout { secs: u64, stderr: String },

    #[error("engine reported success but wrote no output: {}", .0.display())]
    OutputMissing(PathBuf),

    #[error("output path is the same file as the input: {}", .0.display())]
    SameInputOutput(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn join_paths(paths: &[PathBuf]) -> String {
    if paths.is_empty() {
        return "(nothing)".to_string();
    }
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl CompressError {
    pub fn invalid_input(path: &Path, reason: impl Into<String>) -> Self {
        Self::InvalidInputPath {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }
}
