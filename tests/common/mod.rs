#![allow(dead_code)]

use pdf_squash::{
    engine::{CompressRequest, Engine, EngineDiag},
    error::CompressError,
};
use std::cell::RefCell;
use std::path::{Path, PathBuf};

/// Stand-in engine: records requests and writes a fixed-size (or copied) output.
#[derive(Default)]
pub struct FakeEngine {
    pub output_bytes: Option<usize>,
    pub fail: bool,
    pub calls: RefCell<Vec<CompressRequest>>,
}

impl FakeEngine {
    pub fn writing(bytes: usize) -> Self {
        Self {
            output_bytes: Some(bytes),
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }
}

impl Engine for FakeEngine {
    fn doctor(&self) -> Result<EngineDiag, CompressError> {
        Ok(EngineDiag {
            executable: "fake".into(),
            version: Some("0.0".into()),
            ok: true,
            error: None,
        })
    }

    fn compress(&self, req: &CompressRequest) -> Result<(), CompressError> {
        self.calls.borrow_mut().push(req.clone());
        if self.fail {
            return Err(CompressError::EngineFailed {
                status: "exit status: 1".into(),
                stderr: "boom".into(),
            });
        }
        let data = match self.output_bytes {
            Some(n) => vec![b'%'; n],
            None => std::fs::read(&req.input)?,
        };
        std::fs::write(&req.output, data)?;
        Ok(())
    }
}

/// Writes `bytes` bytes of filler under `dir/name` and returns the path.
pub fn write_file(dir: &Path, name: &str, bytes: usize) -> PathBuf {
    let path = dir.join(name);
    let mut data = b"%PDF-1.4\n".to_vec();
    data.resize(bytes.max(data.len()), b' ');
    data.truncate(bytes);
    std::fs::write(&path, data).expect("write fixture");
    path
}
