use crate::config::Open;
use anyhow::{Context, Result, bail};
use std::path::Path;
use std::process::Command;
use tracing::{debug, warn};

/// Program and leading args used to hand a file to the desktop's default viewer.
pub fn opener_command(cfg: &Open) -> Vec<String> {
    if !cfg.command.is_empty() {
        return cfg.command.clone();
    }
    if cfg!(target_os = "macos") {
        vec!["open".into()]
    } else if cfg!(target_os = "windows") {
        vec!["cmd".into(), "/C".into(), "start".into(), "".into()]
    } else {
        vec!["xdg-open".into()]
    }
}

pub fn open_path(cfg: &Open, path: &Path) -> Result<()> {
    let argv = opener_command(cfg);
    let Some((program, rest)) = argv.split_first() else {
        bail!("open.command is empty");
    };
    debug!("opening {} with {:?}", path.display(), argv);

    let status = Command::new(program)
        .args(rest)
        .arg(path)
        .status()
        .with_context(|| format!("running opener: {program}"))?;
    if !status.success() {
        warn!("opener {program} exited with {status}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_command_wins() {
        let cfg = Open {
            command: vec!["evince".into(), "--fullscreen".into()],
        };
        assert_eq!(opener_command(&cfg), vec!["evince", "--fullscreen"]);
    }

    #[test]
    fn platform_default_is_not_empty() {
        assert!(!opener_command(&Open::default()).is_empty());
    }
}
