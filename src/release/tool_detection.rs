//! External tool detection and availability checking.
//!
//! The release pipeline needs `git` and a compile-matrix tool (`gox` by
//! default). `git` must already be installed; the matrix tool is installed on
//! demand.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use super::error::{ReleaseError, ReleaseResult};
use crate::utils::process;

/// Location of `git`, looked up once per process.
pub static GIT: LazyLock<Option<PathBuf>> = LazyLock::new(|| find_tool("git"));

/// Look up `name` on `PATH`.
pub fn find_tool(name: &str) -> Option<PathBuf> {
    match which::which(name) {
        Ok(path) => {
            log::debug!("Found {} at: {}", name, path.display());
            Some(path)
        }
        Err(e) => {
            log::debug!("{name} not found in PATH: {e}");
            None
        }
    }
}

/// Path to `git`, or [`ReleaseError::MissingTool`].
pub fn require_git() -> ReleaseResult<PathBuf> {
    GIT.clone().ok_or_else(|| ReleaseError::MissingTool {
        tool: "git".to_string(),
        hint: "Install git and make sure it is on PATH.".to_string(),
    })
}

/// Locate the compile-matrix tool, installing it with `install` if missing.
///
/// `go install` drops binaries into `$GOBIN` or `$GOPATH/bin`, which are often
/// not on `PATH`, so those are searched after a fresh install.
pub async fn ensure_matrix_tool(
    tool: &str,
    install: &[String],
    cwd: &Path,
) -> ReleaseResult<PathBuf> {
    if let Some(path) = find_tool(tool) {
        return Ok(path);
    }

    let Some((program, args)) = install.split_first() else {
        return Err(missing(tool, "No install command configured."));
    };

    log::warn!("{tool} not found, installing with `{}`", install.join(" "));
    process::run_command(program, args, Some(cwd))
        .await
        .map_err(|e| ReleaseError::ToolInstallFailed {
            tool: tool.to_string(),
            reason: e.to_string(),
        })?;

    if let Some(path) = find_tool(tool).or_else(|| find_in_go_bin(tool)) {
        log::info!("✓ Installed {} at {}", tool, path.display());
        return Ok(path);
    }

    Err(missing(
        tool,
        "It was installed but cannot be found; add the Go bin directory to PATH.",
    ))
}

fn missing(tool: &str, hint: &str) -> ReleaseError {
    ReleaseError::MissingTool {
        tool: tool.to_string(),
        hint: hint.to_string(),
    }
}

fn find_in_go_bin(tool: &str) -> Option<PathBuf> {
    let mut dirs = Vec::new();
    if let Some(gobin) = std::env::var_os("GOBIN") {
        dirs.push(PathBuf::from(gobin));
    }
    if let Some(gopath) = std::env::var_os("GOPATH") {
        dirs.extend(std::env::split_paths(&gopath).map(|p| p.join("bin")));
    }
    if let Some(home) = std::env::var_os("HOME") {
        dirs.push(PathBuf::from(home).join("go").join("bin"));
    }

    let file_name = format!("{tool}{}", std::env::consts::EXE_SUFFIX);
    dirs.into_iter()
        .map(|dir| dir.join(&file_name))
        .find(|candidate| candidate.is_file())
}
