//! Compile-matrix invocation.

use std::path::Path;

use super::config::ReleaseConfig;
use super::error::{ReleaseError, ReleaseResult};
use crate::error::ErrorExt;
use crate::platform::{Arch, Os, ReleaseTarget};
use crate::utils::process;

/// Arguments for a gox-compatible tool.
///
/// The output template makes the tool write
/// `{dist}/{binary}-{os}-{arch}[.exe]`; the tool appends `.exe` itself for
/// Windows.
pub fn matrix_args(config: &ReleaseConfig) -> Vec<String> {
    let oses: Vec<&str> = Os::ALL.iter().map(|os| os.as_str()).collect();
    let arches: Vec<&str> = Arch::ALL.iter().map(|arch| arch.as_str()).collect();
    let output = config
        .dist_dir
        .join(format!("{}-{{{{.OS}}}}-{{{{.Arch}}}}", config.binary));

    vec![
        format!("-os={}", oses.join(" ")),
        format!("-arch={}", arches.join(" ")),
        format!("-output={}", output.display()),
        config.module.clone(),
    ]
}

/// Build every target in one tool run and check that all six binaries exist.
pub async fn compile_matrix(tool: &Path, config: &ReleaseConfig) -> ReleaseResult<Vec<ReleaseTarget>> {
    tokio::fs::create_dir_all(&config.dist_dir)
        .await
        .fs_context("creating dist directory", &config.dist_dir)?;

    let args = matrix_args(config);
    process::run_command(tool, &args, Some(&config.repo_dir)).await?;

    let targets = ReleaseTarget::matrix(&config.binary);
    let missing: Vec<String> = targets
        .iter()
        .map(ReleaseTarget::binary_file_name)
        .filter(|name| !config.dist_dir.join(name).is_file())
        .collect();

    if !missing.is_empty() {
        return Err(ReleaseError::MissingBinaries { missing });
    }

    log::info!("✓ Compiled {} binaries into {}", targets.len(), config.dist_dir.display());
    Ok(targets)
}
