//! Branch guard.

use std::path::Path;

use super::error::{ReleaseError, ReleaseResult};

/// Short name of the branch checked out in the repository containing `dir`.
///
/// Returns `None` when HEAD is detached.
pub fn current_branch(dir: &Path) -> ReleaseResult<Option<String>> {
    let repo = gix::discover(dir)
        .map_err(|e| ReleaseError::Git(format!("Not in a git repository: {e}")))?;

    let head = repo
        .head_name()
        .map_err(|e| ReleaseError::Git(format!("Failed to read HEAD: {e}")))?;

    Ok(head.map(|name| name.shorten().to_string()))
}

/// Fail with [`ReleaseError::WrongBranch`] unless `expected` is checked out.
pub fn ensure_branch(dir: &Path, expected: &str) -> ReleaseResult<()> {
    let actual = current_branch(dir)?;
    log::debug!("Current branch: {actual:?}, release branch: {expected}");

    match actual {
        Some(branch) if branch == expected => Ok(()),
        Some(branch) => Err(ReleaseError::WrongBranch {
            expected: expected.to_string(),
            actual: branch,
        }),
        None => Err(ReleaseError::WrongBranch {
            expected: expected.to_string(),
            actual: "detached HEAD".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo_on(branch: &str) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        gix::init(dir.path()).unwrap();
        std::fs::write(
            dir.path().join(".git").join("HEAD"),
            format!("ref: refs/heads/{branch}\n"),
        )
        .unwrap();
        dir
    }

    #[test]
    fn reads_checked_out_branch() {
        let repo = repo_on("main");
        assert_eq!(current_branch(repo.path()).unwrap().as_deref(), Some("main"));
    }

    #[test]
    fn discovers_repository_from_subdirectory() {
        let repo = repo_on("release/1.x");
        let nested = repo.path().join("cmd").join("relkit");
        std::fs::create_dir_all(&nested).unwrap();

        assert_eq!(
            current_branch(&nested).unwrap().as_deref(),
            Some("release/1.x")
        );
    }

    #[test]
    fn wrong_branch_exits_127() {
        let repo = repo_on("feature");
        let err = ensure_branch(repo.path(), "main").unwrap_err();

        assert_eq!(err.exit_code(), 127);
        assert!(err.to_string().contains("feature"));
        assert!(ensure_branch(repo.path(), "feature").is_ok());
    }

    #[test]
    fn outside_a_repository_is_a_git_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = current_branch(dir.path()).unwrap_err();
        assert!(matches!(err, ReleaseError::Git(_)));
    }
}
