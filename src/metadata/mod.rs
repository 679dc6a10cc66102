//! Release manifest loading.
//!
//! The manifest is the version source of record for the release pipeline. It
//! is a Cargo-style TOML file:
//!
//! ```toml
//! [package]
//! name = "relkit"
//! version = "0.1.0"
//!
//! [package.metadata.release]
//! binary = "relkit"
//! module = "./cmd/relkit"
//! branch = "main"
//! dist-dir = "dist"
//! ```
//!
//! Only `[package].name` and `[package].version` are required.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::bail;
use crate::error::{ErrorExt, Result};

/// Optional `[package.metadata.release]` table.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct ReleaseSettings {
    /// Program name used in artifact names (defaults to the package name)
    pub binary: Option<String>,
    /// Module path handed to the compile-matrix tool
    pub module: Option<String>,
    /// Branch releases must be cut from
    pub branch: Option<String>,
    /// Output directory for binaries and archives
    pub dist_dir: Option<PathBuf>,
    /// Remote the tag is pushed to
    pub remote: Option<String>,
}

/// Parsed manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseManifest {
    /// Package name from `[package]`
    pub name: String,
    /// Package version from `[package]`
    pub version: semver::Version,
    pub settings: ReleaseSettings,
}

impl ReleaseManifest {
    /// Name of the tag a release of this version gets, e.g. `0.1.0`.
    pub fn tag_name(&self) -> String {
        self.version.to_string()
    }
}

#[derive(Deserialize)]
struct RawManifest {
    package: Option<RawPackage>,
}

#[derive(Deserialize)]
struct RawPackage {
    name: Option<String>,
    version: Option<toml::Value>,
    #[serde(default)]
    metadata: Option<RawMetadata>,
}

#[derive(Deserialize)]
struct RawMetadata {
    #[serde(default)]
    release: Option<ReleaseSettings>,
}

/// Read and parse the manifest at `path`.
pub fn load_manifest(path: &Path) -> Result<ReleaseManifest> {
    let content = std::fs::read_to_string(path).fs_context("reading release manifest", path)?;
    parse_manifest(&content, path)
}

/// Parse manifest text; `origin` is only used in error messages.
pub fn parse_manifest(content: &str, origin: &Path) -> Result<ReleaseManifest> {
    let raw: RawManifest = match toml::from_str(content) {
        Ok(raw) => raw,
        Err(e) => bail!("Failed to parse {}: {}", origin.display(), e),
    };

    let Some(package) = raw.package else {
        bail!("No [package] section in {}", origin.display());
    };

    let Some(name) = package.name else {
        bail!("Missing 'name' in [package] of {}", origin.display());
    };

    let version = match package.version {
        Some(toml::Value::String(version)) => version,
        Some(_) => bail!(
            "'version' in [package] of {} must be a literal version string",
            origin.display()
        ),
        None => bail!("Missing 'version' in [package] of {}", origin.display()),
    };
    let version = match semver::Version::parse(version.trim_start_matches('v')) {
        Ok(version) => version,
        Err(e) => bail!("Invalid version '{}' in {}: {}", version, origin.display(), e),
    };

    let settings = package
        .metadata
        .and_then(|m| m.release)
        .unwrap_or_default();

    Ok(ReleaseManifest {
        name,
        version,
        settings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> Result<ReleaseManifest> {
        parse_manifest(content, Path::new("Cargo.toml"))
    }

    #[test]
    fn minimal_manifest() {
        let manifest = parse(
            r#"
            [package]
            name = "relkit"
            version = "0.1.0"
            "#,
        )
        .unwrap();

        assert_eq!(manifest.name, "relkit");
        assert_eq!(manifest.tag_name(), "0.1.0");
        assert_eq!(manifest.settings, ReleaseSettings::default());
    }

    #[test]
    fn release_table_is_read() {
        let manifest = parse(
            r#"
            [package]
            name = "relkit"
            version = "2.3.4-beta.1"

            [package.metadata.release]
            binary = "rk"
            module = "./cmd/rk"
            branch = "release"
            dist-dir = "out"
            remote = "upstream"
            "#,
        )
        .unwrap();

        assert_eq!(manifest.tag_name(), "2.3.4-beta.1");
        assert_eq!(manifest.settings.binary.as_deref(), Some("rk"));
        assert_eq!(manifest.settings.module.as_deref(), Some("./cmd/rk"));
        assert_eq!(manifest.settings.branch.as_deref(), Some("release"));
        assert_eq!(manifest.settings.dist_dir, Some(PathBuf::from("out")));
        assert_eq!(manifest.settings.remote.as_deref(), Some("upstream"));
    }

    #[test]
    fn other_metadata_tables_are_ignored() {
        let manifest = parse(
            r#"
            [package]
            name = "relkit"
            version = "1.0.0"

            [package.metadata.docs]
            all-features = true
            "#,
        )
        .unwrap();
        assert_eq!(manifest.settings, ReleaseSettings::default());
    }

    #[test]
    fn missing_pieces_are_reported() {
        assert!(parse("[workspace]\nmembers = []\n").is_err());
        assert!(parse("[package]\nversion = \"1.0.0\"\n").is_err());
        assert!(parse("[package]\nname = \"relkit\"\n").is_err());
        assert!(
            parse("[package]\nname = \"relkit\"\nversion.workspace = true\n")
                .unwrap_err()
                .to_string()
                .contains("literal version")
        );
        assert!(parse("[package]\nname = \"relkit\"\nversion = \"one\"\n").is_err());
        assert!(parse("not toml at all [").is_err());
    }

    #[test]
    fn load_manifest_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Cargo.toml");
        std::fs::write(&path, "[package]\nname = \"relkit\"\nversion = \"0.9.0\"\n").unwrap();

        assert_eq!(load_manifest(&path).unwrap().tag_name(), "0.9.0");
        assert!(load_manifest(&dir.path().join("missing.toml")).is_err());
    }
}
