use crate::{
    engine::{CompressRequest, Engine},
    error::CompressError,
    preset::Preset,
    report::{CompressionReport, format_mb, format_ratio},
    util::same_file,
    validate::validate_input,
};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct Compressor<E: Engine> {
    engine: E,
}

impl<E: Engine> Compressor<E> {
    pub fn new(engine: E) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Validates, runs the engine once and measures the result.
    ///
    /// Nothing is spawned unless the preset and the input both check out.
    pub fn compress(
        &self,
        input: &Path,
        output: &Path,
        preset_index: i64,
        grayscale: bool,
    ) -> Result<CompressionReport, CompressError> {
        let preset = Preset::from_index(preset_index)?;
        let input_bytes = validate_input(input)?;

        if same_file(input, output) {
            return Err(CompressError::SameInputOutput(output.to_path_buf()));
        }
        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        info!(
            "compressing {} ({}) preset={} grayscale={}",
            input.display(),
            format_mb(input_bytes),
            preset,
            grayscale
        );

        let started = Instant::now();
        let req = CompressRequest {
            input: input.to_path_buf(),
            output: output.to_path_buf(),
            preset,
            grayscale,
        };
        self.engine.compress(&req)?;
        debug!("engine finished in {:?}", started.elapsed());

        let output_bytes = std::fs::metadata(output)
            .map_err(|_| CompressError::OutputMissing(output.to_path_buf()))?
            .len();

        let report = CompressionReport {
            input_path: req.input,
            output_path: req.output,
            input_bytes,
            output_bytes,
            preset,
            grayscale,
        };

        if report.ratio() < 0.0 {
            warn!(
                "output is larger than input ({} -> {}); the PDF was likely already minimal",
                format_mb(input_bytes),
                format_mb(output_bytes)
            );
        } else {
            info!(
                "compressed by {} ({} -> {})",
                format_ratio(report.ratio()),
                format_mb(input_bytes),
                format_mb(output_bytes)
            );
        }

        Ok(report)
    }
}
