use crate::preset::Preset;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Decimal megabyte, matching what file managers show for "MB".
pub const BYTES_PER_MB: f64 = 1_000_000.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompressionReport {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub input_bytes: u64,
    pub output_bytes: u64,
    pub preset: Preset,
    pub grayscale: bool,
}

impl CompressionReport {
    /// Fraction saved; negative when the engine produced a larger file.
    pub fn ratio(&self) -> f64 {
        compression_ratio(self.input_bytes, self.output_bytes)
    }

    pub fn summary_lines(&self) -> Vec<String> {
        vec![
            format!("Compression by {}.", format_ratio(self.ratio())),
            format!("Original:    {:.3}MB", file_size_mb(self.input_bytes)),
            format!("Converted:   {:.3}MB", file_size_mb(self.output_bytes)),
        ]
    }
}

pub fn file_size_mb(bytes: u64) -> f64 {
    bytes as f64 / BYTES_PER_MB
}

pub fn format_mb(bytes: u64) -> String {
    format!("{:.2}MB", file_size_mb(bytes))
}

pub fn compression_ratio(input_bytes: u64, output_bytes: u64) -> f64 {
    if input_bytes == 0 {
        return 0.0;
    }
    1.0 - (output_bytes as f64 / input_bytes as f64)
}

pub fn format_ratio(ratio: f64) -> String {
    format!("{:.0}%", ratio * 100.0)
}
