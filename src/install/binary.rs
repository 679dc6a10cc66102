//! Placing the extracted binary and checking that it runs.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{ErrorExt, Result};
use crate::utils::{fs, process};

/// Smoke test failure after a successful install.
///
/// Reported as a warning; the installed binary is left in place.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PostInstallWarning {
    pub command: String,
    pub reason: String,
}

impl fmt::Display for PostInstallWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "post-install check `{}` failed: {}", self.command, self.reason)
    }
}

/// Copy `source` to `{install_dir}/{name}` and mark it executable.
///
/// The copy is written to a hidden sibling first and renamed over the
/// destination, so an existing install is replaced in one step and a failed
/// copy never leaves a truncated binary behind.
pub async fn install_binary(source: &Path, install_dir: &Path, name: &str) -> Result<PathBuf> {
    tokio::fs::create_dir_all(install_dir)
        .await
        .fs_context("creating install directory", install_dir)?;

    let destination = install_dir.join(name);
    let staging = install_dir.join(format!(".{name}.relkit-new"));

    let placed = async {
        fs::copy_file(source, &staging).await?;
        fs::set_executable(&staging).await?;
        tokio::fs::rename(&staging, &destination)
            .await
            .fs_context("replacing installed binary", &destination)
    }
    .await;

    if let Err(e) = placed {
        if let Err(cleanup) = fs::remove_file(&staging).await {
            log::warn!("Failed to remove {}: {cleanup}", staging.display());
        }
        return Err(e);
    }

    log::info!("Installed {}", destination.display());
    Ok(destination)
}

/// Run `{binary} {arg}` and report a warning if it does not succeed.
pub async fn smoke_test(binary: &Path, arg: &str) -> Option<PostInstallWarning> {
    match process::run_command(binary, &[arg], None).await {
        Ok(output) => {
            let stdout = String::from_utf8_lossy(&output.stdout);
            log::info!("{}", stdout.trim());
            None
        }
        Err(e) => Some(PostInstallWarning {
            command: process::display_command(binary, &[arg]),
            reason: e.to_string(),
        }),
    }
}
