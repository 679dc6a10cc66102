//! Filesystem and process helpers shared by both pipelines.

pub mod fs;
pub mod process;
