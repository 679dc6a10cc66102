//! Release settings, merged from command line, manifest and defaults.

use std::path::{Path, PathBuf};

use path_absolutize::Absolutize;

use super::error::ReleaseResult;
use crate::bail;
use crate::metadata::ReleaseManifest;

pub const DEFAULT_BRANCH: &str = "main";
pub const DEFAULT_DIST_DIR: &str = "dist";
pub const DEFAULT_REMOTE: &str = "origin";
pub const DEFAULT_MODULE: &str = ".";
pub const DEFAULT_MATRIX_TOOL: &str = "gox";
pub const DEFAULT_MATRIX_INSTALL: &str = "go install github.com/mitchellh/gox@latest";

/// Values given on the command line. `None` falls through to the manifest.
#[derive(Clone, Debug, Default)]
pub struct ReleaseOverrides {
    pub branch: Option<String>,
    pub binary: Option<String>,
    pub module: Option<String>,
    pub dist_dir: Option<PathBuf>,
    pub remote: Option<String>,
    pub matrix_tool: Option<String>,
    pub matrix_install: Option<String>,
    pub skip_push: bool,
}

/// Fully resolved release settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReleaseConfig {
    /// Directory commands run in (the manifest's directory)
    pub repo_dir: PathBuf,
    /// Version being released; also the tag name
    pub version: semver::Version,
    pub branch: String,
    pub binary: String,
    pub module: String,
    /// Absolute output directory
    pub dist_dir: PathBuf,
    pub remote: String,
    pub matrix_tool: String,
    /// Command that installs the matrix tool, split on whitespace
    pub matrix_install: Vec<String>,
    pub skip_push: bool,
}

impl ReleaseConfig {
    /// Merge `overrides` over the manifest's release table over defaults.
    ///
    /// Relative paths are resolved against `repo_dir`.
    pub fn resolve(
        repo_dir: &Path,
        manifest: &ReleaseManifest,
        overrides: ReleaseOverrides,
    ) -> ReleaseResult<Self> {
        let settings = &manifest.settings;
        let repo_dir = repo_dir.absolutize()?.into_owned();

        let binary = overrides
            .binary
            .or_else(|| settings.binary.clone())
            .unwrap_or_else(|| manifest.name.clone());
        if binary.is_empty() || binary.contains(['/', '\\']) {
            bail!("'{}' is not a valid binary name", binary);
        }

        let dist_dir = overrides
            .dist_dir
            .or_else(|| settings.dist_dir.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DIST_DIR));
        let dist_dir = dist_dir.absolutize_from(&repo_dir)?.into_owned();

        let matrix_install: Vec<String> = overrides
            .matrix_install
            .as_deref()
            .unwrap_or(DEFAULT_MATRIX_INSTALL)
            .split_whitespace()
            .map(str::to_string)
            .collect();
        if matrix_install.is_empty() {
            bail!("Matrix tool install command is empty");
        }

        Ok(Self {
            version: manifest.version.clone(),
            branch: overrides
                .branch
                .or_else(|| settings.branch.clone())
                .unwrap_or_else(|| DEFAULT_BRANCH.to_string()),
            binary,
            module: overrides
                .module
                .or_else(|| settings.module.clone())
                .unwrap_or_else(|| DEFAULT_MODULE.to_string()),
            dist_dir,
            remote: overrides
                .remote
                .or_else(|| settings.remote.clone())
                .unwrap_or_else(|| DEFAULT_REMOTE.to_string()),
            matrix_tool: overrides
                .matrix_tool
                .unwrap_or_else(|| DEFAULT_MATRIX_TOOL.to_string()),
            matrix_install,
            skip_push: overrides.skip_push,
            repo_dir,
        })
    }

    /// Tag created for this release, e.g. `0.1.0`.
    pub fn tag_name(&self) -> String {
        self.version.to_string()
    }
}
