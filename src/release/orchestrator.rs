//! Release orchestration.
//!
//! [`Releaser`] drives the stages in [`crate::release`] in order and reports
//! what was produced.

use super::config::ReleaseConfig;
use super::error::ReleaseResult;
use super::package::{self, PackagedArtifact};
use super::{branch, compile, tag, tool_detection};
use crate::cli::OutputManager;

/// What a successful release produced.
#[derive(Debug, Clone)]
pub struct ReleaseReport {
    pub tag: String,
    pub artifacts: Vec<PackagedArtifact>,
    /// `false` when the push was skipped
    pub pushed: bool,
}

/// Runs the release pipeline for one configuration.
#[derive(Debug)]
pub struct Releaser {
    config: ReleaseConfig,
    output: OutputManager,
}

impl Releaser {
    pub fn new(config: ReleaseConfig, output: OutputManager) -> Self {
        Self { config, output }
    }

    pub fn config(&self) -> &ReleaseConfig {
        &self.config
    }

    /// Run every stage. Nothing is built or tagged unless the branch guard
    /// passes.
    pub async fn run(&self) -> ReleaseResult<ReleaseReport> {
        let config = &self.config;
        let tag_name = config.tag_name();

        let _ = self.output.section(&format!("Releasing {} {}", config.binary, tag_name));

        branch::ensure_branch(&config.repo_dir, &config.branch)?;
        let _ = self.output.verbose(&format!("   On branch {}", config.branch));

        let git = tool_detection::require_git()?;
        let matrix_tool = tool_detection::ensure_matrix_tool(
            &config.matrix_tool,
            &config.matrix_install,
            &config.repo_dir,
        )
        .await?;

        let _ = self.output.progress("Compiling release matrix");
        let targets = compile::compile_matrix(&matrix_tool, config).await?;

        let _ = self.output.progress("Packaging archives");
        let archives = package::archive_all(&config.dist_dir, &targets).await?;
        let artifacts = package::write_digests(archives).await?;

        tag::create_tag(&git, &config.repo_dir, &tag_name).await?;
        let pushed = if config.skip_push {
            log::info!("Skipping push of {tag_name}");
            false
        } else {
            tag::push_tag(&git, &config.repo_dir, &config.remote, &tag_name).await?;
            true
        };

        let report = ReleaseReport {
            tag: tag_name,
            artifacts,
            pushed,
        };
        self.print_summary(&report);
        Ok(report)
    }

    fn print_summary(&self, report: &ReleaseReport) {
        let _ = self.output.success(&format!(
            "Released {} ({} artifacts)",
            report.tag,
            report.artifacts.len()
        ));
        for artifact in &report.artifacts {
            let _ = self.output.indent(&format!(
                "{}  {}",
                artifact.digest,
                artifact.archive.path.display()
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::release::error::ReleaseError;
    use crate::release::testing::{git, init_git_repo, release_config};
    use crate::release::tool_detection::find_tool;

    fn quiet() -> OutputManager {
        OutputManager::new(false, true)
    }

    #[tokio::test]
    async fn wrong_branch_stops_before_any_work() {
        if find_tool("git").is_none() {
            return;
        }
        let repo = tempfile::tempdir().unwrap();
        init_git_repo(repo.path(), "feature/x");
        let config = release_config(repo.path());

        let err = Releaser::new(config.clone(), quiet()).run().await.unwrap_err();

        assert!(matches!(err, ReleaseError::WrongBranch { .. }));
        assert_eq!(err.exit_code(), 127);
        assert!(!config.dist_dir.exists());
        assert_eq!(git(repo.path(), &["tag", "--list"]), "");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn full_release_publishes_archives_and_tag() {
        use crate::checksum::{SidecarRecord, calculate_sha256};
        use crate::release::testing::write_fake_matrix_tool;

        if find_tool("git").is_none() {
            return;
        }
        let root = tempfile::tempdir().unwrap();
        let remote = root.path().join("remote.git");
        let repo = root.path().join("work");
        std::fs::create_dir_all(&repo).unwrap();
        git(root.path(), &["init", "--bare", "--quiet", &remote.to_string_lossy()]);
        init_git_repo(&repo, "main");
        git(&repo, &["remote", "add", "origin", &remote.to_string_lossy()]);

        let tool = write_fake_matrix_tool(root.path(), &[]);
        let mut config = release_config(&repo);
        config.matrix_tool = tool.to_string_lossy().into_owned();
        config.skip_push = false;

        let report = Releaser::new(config.clone(), quiet()).run().await.unwrap();

        assert_eq!(report.tag, "0.1.0");
        assert!(report.pushed);
        assert_eq!(report.artifacts.len(), 6);
        for artifact in &report.artifacts {
            let sidecar = std::fs::read_to_string(&artifact.sidecar).unwrap();
            let record = SidecarRecord::parse(&sidecar).unwrap();
            let actual = calculate_sha256(&artifact.archive.path).await.unwrap();
            assert_eq!(record.digest, actual);
            assert!(
                !config
                    .dist_dir
                    .join(artifact.archive.target.binary_file_name())
                    .exists()
            );
        }
        assert!(config.dist_dir.join("relkit-linux-amd64.tar.gz").is_file());
        assert!(config.dist_dir.join("relkit-windows-386.zip.sha256sum").is_file());

        let remote_tags = git(&repo, &["ls-remote", "--tags", "origin"]);
        assert!(remote_tags.contains("refs/tags/0.1.0"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn incomplete_matrix_creates_no_tag() {
        use crate::release::testing::write_fake_matrix_tool;

        if find_tool("git").is_none() {
            return;
        }
        let repo = tempfile::tempdir().unwrap();
        init_git_repo(repo.path(), "main");
        let tool_dir = tempfile::tempdir().unwrap();
        let tool = write_fake_matrix_tool(tool_dir.path(), &["darwin-386"]);
        let mut config = release_config(repo.path());
        config.matrix_tool = tool.to_string_lossy().into_owned();

        let err = Releaser::new(config, quiet()).run().await.unwrap_err();

        assert!(matches!(err, ReleaseError::MissingBinaries { .. }));
        assert_eq!(git(repo.path(), &["tag", "--list"]), "");
    }
}
