use crate::{
    compressor::Compressor,
    config::Config,
    engine::Engine,
    report::CompressionReport,
    util::same_file,
    validate::validate_input,
};
use anyhow::{Context, Result, bail};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub input: PathBuf,
    /// `None` means compress in place through a temp file next to the input.
    pub output: Option<PathBuf>,
    pub preset: i64,
    pub grayscale: bool,
    pub backup: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchOutcome {
    pub report: CompressionReport,
    pub final_path: PathBuf,
    pub backup_path: Option<PathBuf>,
    pub in_place: bool,
}

pub fn run_batch<E: Engine>(
    cfg: &Config,
    compressor: &Compressor<E>,
    opts: &BatchOptions,
) -> Result<BatchOutcome> {
    let Some(output) = opts.output.as_deref() else {
        return run_in_place(cfg, compressor, opts);
    };

    if opts.backup {
        warn!("--backup only applies when compressing in place; ignoring it");
    }
    let report = compressor
        .compress(&opts.input, output, opts.preset, opts.grayscale)
        .with_context(|| format!("compressing {}", opts.input.display()))?;

    Ok(BatchOutcome {
        final_path: output.to_path_buf(),
        report,
        backup_path: None,
        in_place: false,
    })
}

fn run_in_place<E: Engine>(
    cfg: &Config,
    compressor: &Compressor<E>,
    opts: &BatchOptions,
) -> Result<BatchOutcome> {
    validate_input(&opts.input)
        .with_context(|| format!("compressing {}", opts.input.display()))?;

    // Uniquely named; dropping it removes only this run's file.
    let temp = tempfile::Builder::new()
        .prefix(&cfg.output.temp_prefix)
        .suffix(".pdf")
        .tempfile_in(scratch_dir(&opts.input))
        .with_context(|| format!("creating scratch file next to {}", opts.input.display()))?
        .into_temp_path();

    let mut report = compressor
        .compress(&opts.input, &temp, opts.preset, opts.grayscale)
        .with_context(|| format!("compressing {}", opts.input.display()))?;

    let backup_path = if opts.backup {
        let backup = backup_path(&opts.input, &cfg.output.backup_suffix);
        if same_file(&opts.input, &backup) {
            bail!(
                "backup path {} is the input itself; set a non-empty output.backup_suffix",
                backup.display()
            );
        }
        std::fs::copy(&opts.input, &backup).with_context(|| {
            format!(
                "backing up {} to {}",
                opts.input.display(),
                backup.display()
            )
        })?;
        info!("backup written to {}", backup.display());
        Some(backup)
    } else {
        None
    };

    std::fs::copy(&temp, &opts.input).with_context(|| {
        format!(
            "replacing {} with {}",
            opts.input.display(),
            temp.display()
        )
    })?;
    let temp_display = temp.display().to_string();
    temp.close()
        .with_context(|| format!("removing scratch file {temp_display}"))?;

    report.output_path = opts.input.clone();
    Ok(BatchOutcome {
        report,
        final_path: opts.input.clone(),
        backup_path,
        in_place: true,
    })
}

/// `dir/name.pdf` -> `dir/name<suffix>.pdf`.
pub fn backup_path(input: &Path, suffix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match input.extension() {
        Some(ext) => format!("{stem}{suffix}.{}", ext.to_string_lossy()),
        None => format!("{stem}{suffix}"),
    };
    input.with_file_name(name)
}

/// Directory the scratch output is created in: the input's own.
pub fn scratch_dir(input: &Path) -> PathBuf {
    match input.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backup_keeps_extension_case() {
        assert_eq!(
            backup_path(Path::new("/tmp/report.PDF"), "_BACKUP"),
            PathBuf::from("/tmp/report_BACKUP.PDF")
        );
    }

    #[test]
    fn scratch_dir_is_the_input_dir() {
        assert_eq!(scratch_dir(Path::new("docs/a.pdf")), PathBuf::from("docs"));
        assert_eq!(scratch_dir(Path::new("a.pdf")), PathBuf::from("."));
    }
}
