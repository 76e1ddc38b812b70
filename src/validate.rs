use crate::error::CompressError;
use std::path::Path;

pub const PDF_EXTENSION: &str = "pdf";

/// Checks that `input` is an existing PDF and returns its size in bytes.
pub fn validate_input(input: &Path) -> Result<u64, CompressError> {
    validate_with_extension(input, PDF_EXTENSION)
}

pub fn validate_with_extension(input: &Path, expected: &str) -> Result<u64, CompressError> {
    let meta = std::fs::metadata(input)
        .map_err(|e| CompressError::invalid_input(input, e.to_string()))?;
    if !meta.is_file() {
        return Err(CompressError::invalid_input(input, "not a regular file"));
    }

    let ext_ok = input
        .extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(expected));
    if !ext_ok {
        return Err(CompressError::WrongExtension {
            path: input.to_path_buf(),
            expected: expected.to_string(),
        });
    }

    Ok(meta.len())
}
