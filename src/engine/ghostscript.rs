use super::{
    Engine,
    types::{CompressRequest, EngineDiag},
};
use crate::config::{self, Config};
use crate::error::CompressError;
use std::ffi::OsString;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Output, Stdio};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct GhostscriptEngine {
    exe: PathBuf,
    settings: config::Engine,
}

impl GhostscriptEngine {
    pub fn new(cfg: &Config) -> Result<Self, CompressError> {
        let exe = resolve_executable(&cfg.engine, &cfg.app_dir())?;
        debug!("ghostscript executable: {}", exe.display());
        Ok(Self::with_executable(exe, &cfg.engine))
    }

    pub fn with_executable(exe: PathBuf, settings: &config::Engine) -> Self {
        Self {
            exe,
            settings: settings.clone(),
        }
    }

    pub fn executable(&self) -> &Path {
        &self.exe
    }

    fn run(&self, args: &[OsString]) -> Result<Output, CompressError> {
        debug!(
            "ghostscript run {} {:?} timeout={}s",
            self.exe.display(),
            args,
            self.settings.timeout_seconds
        );
        let mut cmd = Command::new(&self.exe);
        cmd.args(args);
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        let mut child = cmd.spawn().map_err(|source| CompressError::EngineSpawn {
            exe: self.exe.clone(),
            source,
        })?;

        if self.settings.timeout_seconds > 0 {
            wait_with_timeout(&mut child, Duration::from_secs(self.settings.timeout_seconds))
        } else {
            Ok(child.wait_with_output()?)
        }
    }
}

/// Finds the engine binary: an explicit path, or the bundled `data/` dir, then
/// next to the app, then `PATH`.
pub fn resolve_executable(
    settings: &config::Engine,
    app_dir: &Path,
) -> Result<PathBuf, CompressError> {
    let raw = settings.executable.trim();
    if !raw.is_empty() && !raw.eq_ignore_ascii_case("auto") {
        let p = crate::util::expand_tilde(raw);
        if p.is_file() {
            return Ok(p);
        }
        if p.components().count() == 1 {
            if let Ok(found) = which::which(&p) {
                return Ok(found);
            }
        }
        return Err(CompressError::EngineNotFound { searched: vec![p] });
    }

    let names: Vec<&str> = settings
        .candidates
        .iter()
        .map(|c| c.trim())
        .filter(|c| !c.is_empty())
        .collect();

    let mut searched = Vec::new();
    for dir in [app_dir.join("data"), app_dir.to_path_buf()] {
        for name in &names {
            let p = dir.join(exe_file_name(name));
            if p.is_file() {
                return Ok(p);
            }
            searched.push(p);
        }
    }

    for name in &names {
        if let Ok(p) = which::which(name) {
            return Ok(p);
        }
        searched.push(PathBuf::from(format!("$PATH/{name}")));
    }

    Err(CompressError::EngineNotFound { searched })
}

fn exe_file_name(name: &str) -> String {
    if Path::new(name).extension().is_some() {
        name.to_string()
    } else {
        format!("{name}{}", std::env::consts::EXE_SUFFIX)
    }
}

/// Argument vector for one `pdfwrite` pass, input path last.
pub fn build_args(req: &CompressRequest, settings: &config::Engine) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![
        "-sDEVICE=pdfwrite".into(),
        format!("-dCompatibilityLevel={}", settings.compatibility_level).into(),
        format!("-dPDFSETTINGS={}", req.preset.flag()).into(),
        "-dNOPAUSE".into(),
        "-dQUIET".into(),
        "-dBATCH".into(),
    ];
    if req.grayscale {
        args.push("-dColorConversionStrategy=/Gray".into());
        args.push("-dProcessColorModel=/DeviceGray".into());
    }
    args.extend(settings.extra_args.iter().map(OsString::from));

    let mut out_flag = OsString::from("-sOutputFile=");
    out_flag.push(&req.output);
    args.push(out_flag);
    args.push(req.input.clone().into_os_string());
    args
}

impl Engine for GhostscriptEngine {
    fn doctor(&self) -> Result<EngineDiag, CompressError> {
        let exe = self.exe.display().to_string();
        let out = match self.run(&["--version".into()]) {
            Ok(out) => out,
            Err(e) => {
                return Ok(EngineDiag {
                    executable: exe,
                    version: None,
                    ok: false,
                    error: Some(e.to_string()),
                });
            }
        };
        let version = String::from_utf8_lossy(&out.stdout).trim().to_string();
        let ok = out.status.success() && !version.is_empty();
        Ok(EngineDiag {
            executable: exe,
            version: (!version.is_empty()).then_some(version),
            ok,
            error: (!ok).then(|| String::from_utf8_lossy(&out.stderr).trim().to_string()),
        })
    }

    fn compress(&self, req: &CompressRequest) -> Result<(), CompressError> {
        info!(
            "ghostscript preset={} grayscale={} {} -> {}",
            req.preset,
            req.grayscale,
            req.input.display(),
            req.output.display()
        );
        let args = build_args(req, &self.settings);
        let output = self.run(&args)?;

        if !output.status.success() {
            return Err(CompressError::EngineFailed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        if !output.stderr.is_empty() {
            debug!(
                "ghostscript stderr: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        if !req.output.is_file() {
            return Err(CompressError::OutputMissing(req.output.clone()));
        }
        Ok(())
    }
}

fn wait_with_timeout(child: &mut Child, timeout: Duration) -> Result<Output, CompressError> {
    // Drain pipes while waiting so a chatty engine can't block on a full buffer.
    let stdout_reader = child.stdout.take();
    let stderr_reader = child.stderr.take();

    let stdout_thread = std::thread::spawn(move || -> std::io::Result<Vec<u8>> {
        let mut buf = Vec::new();
        if let Some(mut out) = stdout_reader {
            out.read_to_end(&mut buf)?;
        }
        Ok(buf)
    });

    let stderr_thread = std::thread::spawn(move || -> std::io::Result<Vec<u8>> {
        let mut buf = Vec::new();
        if let Some(mut err) = stderr_reader {
            err.read_to_end(&mut buf)?;
        }
        Ok(buf)
    });

    let join = |h: JoinHandle<std::io::Result<Vec<u8>>>| -> Result<Vec<u8>, CompressError> {
        h.join()
            .map_err(|_| std::io::Error::other("pipe reader thread panicked"))?
            .map_err(CompressError::from)
    };

    let start = Instant::now();
    loop {
        if let Some(status) = child.try_wait()? {
            let stdout = join(stdout_thread)?;
            let stderr = join(stderr_thread)?;
            return Ok(Output {
                status,
                stdout,
                stderr,
            });
        }

        if start.elapsed() > timeout {
            warn!("ghostscript timed out after {:?}", timeout);
            let _ = child.kill();
            child.wait()?;
            let _ = join(stdout_thread);
            let stderr = join(stderr_thread).unwrap_or_default();
            return Err(CompressError::EngineTimeout {
                secs: timeout.as_secs(),
                stderr: String::from_utf8_lossy(&stderr).trim().to_string(),
            });
        }

        std::thread::sleep(Duration::from_millis(50));
    }
}
