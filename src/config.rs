use crate::preset::Preset;
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub global: Global,
    #[serde(default)]
    pub paths: Paths,
    #[serde(default)]
    pub engine: Engine,
    #[serde(default)]
    pub defaults: Defaults,
    #[serde(default)]
    pub output: Output,
    #[serde(default)]
    pub gui: Gui,
    #[serde(default)]
    pub open: Open,
    #[serde(default)]
    pub logging: Logging,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config: {}", path.display()))?;
        let cfg: Config = toml::from_str(&raw).with_context(|| "parsing TOML")?;
        cfg.validate()
            .with_context(|| format!("invalid config: {}", path.display()))?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.defaults.preset > Preset::MAX_INDEX {
            bail!(
                "defaults.preset must be between 0 and {}, got {}",
                Preset::MAX_INDEX,
                self.defaults.preset
            );
        }
        if self.engine.candidates.iter().all(|c| c.trim().is_empty()) {
            bail!("engine.candidates must name at least one executable");
        }
        if self.output.temp_prefix.trim().is_empty() {
            bail!("output.temp_prefix must not be empty");
        }
        if self.output.backup_suffix.is_empty() {
            bail!("output.backup_suffix must not be empty");
        }
        Ok(())
    }

    /// Directory holding a bundled engine and the GUI's output file.
    pub fn app_dir(&self) -> PathBuf {
        if !self.paths.app_dir.is_empty() {
            return crate::util::expand_tilde(&self.paths.app_dir);
        }
        match std::env::current_exe() {
            Ok(exe) => exe
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from(".")),
            Err(e) => {
                warn!("current_exe unavailable ({e}); using working directory as app_dir");
                PathBuf::from(".")
            }
        }
    }

    pub fn gui_output_path(&self) -> PathBuf {
        let dir = if self.gui.output_dir.is_empty() {
            self.app_dir()
        } else {
            crate::util::expand_tilde(&self.gui.output_dir)
        };
        dir.join(&self.gui.output_filename)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Global {
    pub print_summary_json: bool,
}
impl Default for Global {
    fn default() -> Self {
        Self {
            print_summary_json: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Paths {
    /// Empty means "directory of the running executable".
    pub app_dir: String,
}
impl Default for Paths {
    fn default() -> Self {
        Self {
            app_dir: "".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Engine {
    pub executable: String,
    pub candidates: Vec<String>,
    pub compatibility_level: String,
    pub timeout_seconds: u64,
    pub extra_args: Vec<String>,
}
impl Default for Engine {
    fn default() -> Self {
        Self {
            executable: "auto".into(),
            candidates: vec!["gswin64c".into(), "gswin32c".into(), "gs".into()],
            compatibility_level: "1.4".into(),
            timeout_seconds: 0,
            extra_args: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Defaults {
    pub preset: u8,
    pub grayscale: bool,
}
impl Default for Defaults {
    fn default() -> Self {
        Self {
            preset: Preset::DEFAULT_INDEX,
            grayscale: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Output {
    /// Prefix of the scratch file written next to the input during in-place runs.
    pub temp_prefix: String,
    pub backup_suffix: String,
}
impl Default for Output {
    fn default() -> Self {
        Self {
            temp_prefix: ".pdf-squash-".into(),
            backup_suffix: "_BACKUP".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Gui {
    pub output_dir: String,
    pub output_filename: String,
}
impl Default for Gui {
    fn default() -> Self {
        Self {
            output_dir: "".into(),
            output_filename: "compressed.pdf".into(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Open {
    /// Program plus leading arguments; the file path is appended. Empty picks the platform opener.
    #[serde(default)]
    pub command: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Logging {
    pub level: String,
    pub json: bool,
    pub write_to_file: bool,
    pub file_path: String,
}
impl Default for Logging {
    fn default() -> Self {
        Self {
            level: "info".into(),
            json: false,
            write_to_file: false,
            file_path: "".into(),
        }
    }
}
