pub mod ghostscript;
pub mod types;

use crate::error::CompressError;

pub use types::{CompressRequest, EngineDiag};

/// An external program that rewrites one PDF into a smaller one.
pub trait Engine {
    fn doctor(&self) -> Result<EngineDiag, CompressError>;
    fn compress(&self, req: &CompressRequest) -> Result<(), CompressError>;
}
