use crate::{
    compressor::Compressor,
    config::Config,
    engine::Engine,
    error::CompressError,
    preset::Preset,
    report::{CompressionReport, format_mb, format_ratio},
    validate::validate_input,
};
use std::fmt::Display;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Source of a user-chosen file; the GUI backs this with a native dialog.
pub trait FilePicker {
    fn pick_pdf(&self, start_dir: &Path) -> Option<PathBuf>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    Idle,
    FileSelected,
    Compressing,
    Compressed,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormLabels {
    pub selected_file: String,
    pub size: String,
    pub compressed_size: String,
    pub compressed_location: String,
}

/// Everything a worker needs to run one compression away from the form.
#[derive(Debug, Clone)]
pub struct CompressJob {
    pub input: PathBuf,
    pub output: PathBuf,
    pub preset: u8,
    pub grayscale: bool,
}

impl CompressJob {
    pub fn run<E: Engine>(&self, compressor: &Compressor<E>) -> Result<CompressionReport, CompressError> {
        compressor.compress(
            &self.input,
            &self.output,
            i64::from(self.preset),
            self.grayscale,
        )
    }
}

#[derive(Debug, Clone)]
pub struct FormController {
    state: FormState,
    selected: Option<PathBuf>,
    preset: u8,
    grayscale: bool,
    labels: FormLabels,
    status: String,
    start_dir: PathBuf,
    output_path: PathBuf,
}

impl FormController {
    pub fn new(cfg: &Config) -> Self {
        Self::with_paths(
            cfg.app_dir(),
            cfg.gui_output_path(),
            cfg.defaults.preset,
            cfg.defaults.grayscale,
        )
    }

    pub fn with_paths(start_dir: PathBuf, output_path: PathBuf, preset: u8, grayscale: bool) -> Self {
        Self {
            state: FormState::Idle,
            selected: None,
            preset: preset.min(Preset::MAX_INDEX),
            grayscale,
            labels: FormLabels::default(),
            status: String::new(),
            start_dir,
            output_path,
        }
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    pub fn selected(&self) -> Option<&Path> {
        self.selected.as_deref()
    }

    pub fn labels(&self) -> &FormLabels {
        &self.labels
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    pub fn preset(&self) -> u8 {
        self.preset
    }

    pub fn preset_kind(&self) -> Preset {
        Preset::ALL[usize::from(self.preset)]
    }

    /// Spinner semantics: values outside 0..=4 are clamped.
    pub fn set_preset(&mut self, value: i64) {
        self.preset = value.clamp(0, i64::from(Preset::MAX_INDEX)) as u8;
    }

    pub fn step_preset(&mut self, delta: i64) {
        self.set_preset(i64::from(self.preset) + delta);
    }

    pub fn grayscale(&self) -> bool {
        self.grayscale
    }

    pub fn set_grayscale(&mut self, grayscale: bool) {
        self.grayscale = grayscale;
    }

    pub fn can_compress(&self) -> bool {
        self.selected.is_some() && self.state != FormState::Compressing
    }

    /// Browse handler. Returns true when a new file was accepted.
    pub fn select_file(&mut self, picker: &dyn FilePicker) -> bool {
        if self.state == FormState::Compressing {
            return false;
        }
        self.labels.compressed_size.clear();

        let Some(path) = picker.pick_pdf(&self.start_dir) else {
            return false;
        };

        match validate_input(&path) {
            Ok(bytes) => {
                info!("selected {} ({})", path.display(), format_mb(bytes));
                self.labels.selected_file = path.display().to_string();
                self.labels.size = format_mb(bytes);
                self.status.clear();
                self.selected = Some(path);
                self.state = FormState::FileSelected;
                true
            }
            Err(e) => {
                warn!("rejected selection: {e}");
                self.status = e.to_string();
                false
            }
        }
    }

    /// Compress click. `None` when there is nothing to do.
    pub fn begin_compress(&mut self) -> Option<CompressJob> {
        if !self.can_compress() {
            return None;
        }
        let input = self.selected.clone()?;
        self.state = FormState::Compressing;
        self.status = format!("Compressing with preset {}...", self.preset_kind());
        Some(CompressJob {
            input,
            output: self.output_path.clone(),
            preset: self.preset,
            grayscale: self.grayscale,
        })
    }

    pub fn finish_compress<D: Display>(&mut self, result: Result<CompressionReport, D>) {
        match result {
            Ok(report) => {
                self.labels.compressed_size = format_mb(report.output_bytes);
                self.labels.compressed_location = report.output_path.display().to_string();
                self.status = format!("Compressed by {}.", format_ratio(report.ratio()));
                self.state = FormState::Compressed;
            }
            Err(e) => {
                self.status = format!("Compression failed: {e}");
                self.state = if self.selected.is_some() {
                    FormState::FileSelected
                } else {
                    FormState::Idle
                };
            }
        }
    }

    /// Runs the job on the calling thread, blocking until the engine exits.
    pub fn compress_blocking<E: Engine>(&mut self, compressor: &Compressor<E>) -> bool {
        let Some(job) = self.begin_compress() else {
            return false;
        };
        let result = job.run(compressor);
        let ok = result.is_ok();
        self.finish_compress(result);
        ok
    }
}
