pub mod batch;
pub mod cli;
pub mod compressor;
pub mod config;
pub mod engine;
pub mod error;
pub mod form;
#[cfg(feature = "gui")]
pub mod gui;
pub mod opener;
pub mod preset;
pub mod report;
pub mod util;
pub mod validate;
