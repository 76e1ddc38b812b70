use crate::{
    batch::{BatchOptions, run_batch},
    compressor::Compressor,
    config::Config,
    engine::{Engine, ghostscript::GhostscriptEngine},
    preset::Preset,
    util::{ensure_dir, now_rfc3339},
};
use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "pdf-squash")]
#[command(about = "Shrink PDF files with Ghostscript quality presets")]
pub struct Args {
    #[command(subcommand)]
    pub cmd: Command,

    /// Path to config TOML. If omitted, uses ./pdf-squash.toml if present.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Override log level (trace/debug/info/warn/error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compress one PDF.
    Compress {
        /// Relative or absolute path of the input PDF file.
        input: PathBuf,
        /// Output PDF path. Without it the input is replaced in place.
        #[arg(short = 'o', long = "out")]
        out: Option<PathBuf>,
        /// Compression level from 0 (default) to 4 (screen).
        #[arg(short = 'c', long = "compress", allow_negative_numbers = true)]
        compress: Option<i64>,
        /// Convert to grayscale.
        #[arg(short = 'g', long)]
        grayscale: bool,
        /// Keep a copy of the original when compressing in place.
        #[arg(short = 'b', long)]
        backup: bool,
        /// Open the resulting PDF afterwards.
        #[arg(long)]
        open: bool,
        /// Print a JSON summary instead of the text report.
        #[arg(long)]
        json: bool,
    },
    /// Report which engine would be used and its version.
    Doctor {},
    /// List the compression presets.
    Presets {},
    /// Open the desktop form.
    #[cfg(feature = "gui")]
    Gui {},
}

pub fn dispatch(args: Args) -> Result<()> {
    let cfg = match resolve_config_path(args.config.as_deref()) {
        Some(path) => Config::load(&path)?,
        None => Config::default(),
    };
    let _guard = init_logging(&args, &cfg)?;

    match &args.cmd {
        Command::Compress {
            input,
            out,
            compress,
            grayscale,
            backup,
            open,
            json,
        } => {
            let opts = BatchOptions {
                input: input.clone(),
                output: out.clone(),
                preset: compress.unwrap_or(i64::from(cfg.defaults.preset)),
                grayscale: *grayscale || cfg.defaults.grayscale,
                backup: *backup,
            };
            compress_cmd(&cfg, &opts, *open, *json || cfg.global.print_summary_json)
        }
        Command::Doctor {} => doctor(&cfg),
        Command::Presets {} => presets(),
        #[cfg(feature = "gui")]
        Command::Gui {} => crate::gui::run(&cfg),
    }
}

fn resolve_config_path(user: Option<&Path>) -> Option<PathBuf> {
    if let Some(p) = user {
        return Some(p.to_path_buf());
    }
    let default = PathBuf::from("pdf-squash.toml");
    default.exists().then_some(default)
}

fn init_logging(args: &Args, cfg: &Config) -> Result<Option<WorkerGuard>> {
    let directive = log_directive(
        args.log_level.as_deref(),
        std::env::var(LOG_ENV).ok(),
        std::env::var(EnvFilter::DEFAULT_ENV).ok(),
        &cfg.logging.level,
    );
    let filter = EnvFilter::try_new(&directive)
        .with_context(|| format!("bad log filter: {directive}"))?;

    let stderr_layer = if cfg.logging.json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .boxed()
    };

    let (file_layer, guard) = match resolve_log_path(cfg) {
        Some(path) => {
            let parent = path.parent().unwrap_or_else(|| Path::new("."));
            if !parent.as_os_str().is_empty() {
                ensure_dir(parent)?;
            }
            let file = std::fs::File::create(&path)
                .with_context(|| format!("create log file: {}", path.display()))?;
            let (non_blocking, guard) = tracing_appender::non_blocking(file);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .boxed();
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow!("failed to init logging: {e}"))?;

    Ok(guard)
}

const LOG_ENV: &str = "PDF_SQUASH_LOG";

/// `--log-level`, then `PDF_SQUASH_LOG`, then `RUST_LOG`, then the config level.
fn log_directive(
    cli: Option<&str>,
    app_env: Option<String>,
    rust_env: Option<String>,
    cfg_level: &str,
) -> String {
    cli.map(str::to_string)
        .or(app_env.filter(|v| !v.trim().is_empty()))
        .or(rust_env.filter(|v| !v.trim().is_empty()))
        .unwrap_or_else(|| cfg_level.to_string())
}

fn resolve_log_path(cfg: &Config) -> Option<PathBuf> {
    if !cfg.logging.write_to_file {
        return None;
    }
    if !cfg.logging.file_path.is_empty() {
        return Some(PathBuf::from(&cfg.logging.file_path));
    }
    Some(cfg.app_dir().join("pdf-squash.log"))
}

fn compress_cmd(cfg: &Config, opts: &BatchOptions, open: bool, json: bool) -> Result<()> {
    let engine = GhostscriptEngine::new(cfg)?;
    let compressor = Compressor::new(engine);

    let started = now_rfc3339();
    let outcome = run_batch(cfg, &compressor, opts)?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "started": started,
                "finished": now_rfc3339(),
                "engine": compressor.engine().executable(),
                "outcome": outcome,
                "ratio": outcome.report.ratio(),
                "status": "ok"
            }))?
        );
    } else {
        for line in outcome.report.summary_lines() {
            println!("{line}");
        }
        if let Some(backup) = &outcome.backup_path {
            println!("Backup:      {}", backup.display());
        }
        println!("Output:      {}", outcome.final_path.display());
        println!("Done.");
    }

    if open {
        info!("opening {}", outcome.final_path.display());
        crate::opener::open_path(&cfg.open, &outcome.final_path)?;
    }
    Ok(())
}

fn doctor(cfg: &Config) -> Result<()> {
    let engine = GhostscriptEngine::new(cfg)?;
    let diag = engine.doctor()?;
    println!("{}", serde_json::to_string_pretty(&diag)?);
    if !diag.ok {
        return Err(anyhow!(
            "engine check failed: {}",
            diag.error.unwrap_or_else(|| "no version reported".into())
        ));
    }
    Ok(())
}

fn presets() -> Result<()> {
    for p in Preset::ALL {
        let marker = if p.index() == Preset::DEFAULT_INDEX { " (default)" } else { "" };
        println!("{}  {:<9} {:<10} {}{}", p.index(), p.name(), p.flag(), p.description(), marker);
    }
    Ok(())
}
