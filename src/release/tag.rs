//! Release tag creation and push.

use std::path::Path;

use super::error::{ReleaseError, ReleaseResult};
use crate::error::Error;
use crate::utils::process;

/// Message stored in the annotated tag.
pub fn tag_message(tag: &str) -> String {
    format!("Release {tag}")
}

/// Create the annotated tag `tag` at HEAD.
pub async fn create_tag(git: &Path, repo_dir: &Path, tag: &str) -> ReleaseResult<()> {
    let message = tag_message(tag);
    process::run_command(git, &["tag", "-a", tag, "-m", message.as_str()], Some(repo_dir)).await?;
    log::info!("✓ Created tag {tag}");
    Ok(())
}

/// Push `tag` to `remote`.
///
/// ## Authentication Requirements
///
/// **SSH (Recommended)**:
/// ```bash
/// eval "$(ssh-agent -s)"
/// ssh-add ~/.ssh/id_rsa
/// ```
///
/// **HTTPS**:
/// ```bash
/// git config --global credential.helper store
/// ```
pub async fn push_tag(git: &Path, repo_dir: &Path, remote: &str, tag: &str) -> ReleaseResult<()> {
    let refspec = format!("refs/tags/{tag}");
    process::run_command(git, &["push", remote, refspec.as_str()], Some(repo_dir))
        .await
        .map_err(|e| {
            ReleaseError::Other(Error::CommandFailed {
                command: format!("git push {remote} {refspec}"),
                reason: format!(
                    "Failed to push tag to {remote}. Ensure git authentication is configured:\n\
                     \n\
                     SSH: eval \"$(ssh-agent -s)\" && ssh-add ~/.ssh/id_rsa\n\
                     HTTPS: git config --global credential.helper store\n\
                     \n\
                     Error: {e}"
                ),
            })
        })?;
    log::info!("✓ Pushed {tag} to {remote}");
    Ok(())
}
