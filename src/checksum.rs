//! SHA-256 digests and `.sha256sum` sidecar files.
//!
//! The release pipeline writes one sidecar per archive; the installer reads it
//! back and compares. Sidecars use the text format of `sha256sum` and
//! `shasum -a 256`: one line, `<hex digest>  <file name>`.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use sha2::{Digest, Sha256};

use crate::error::{ErrorExt, Result};

/// File name suffix of checksum sidecars.
pub const SIDECAR_SUFFIX: &str = ".sha256sum";

/// `<64 hex>` then a space, then a space (text mode) or `*` (binary mode), then the name.
static SIDECAR_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9A-Fa-f]{64}) [ *](.+)$").unwrap_or_else(|e| {
        unreachable!("sidecar pattern is a valid regex: {e}")
    })
});

/// Calculates the SHA-256 checksum of a file.
///
/// Reads the file in 8KB chunks on the blocking pool so large archives never
/// sit in memory or stall the runtime.
///
/// # Returns
///
/// * `Ok(String)` - Lowercase hex-encoded SHA-256 hash (64 characters)
/// * `Err` - If the file cannot be read
pub async fn calculate_sha256(path: &Path) -> Result<String> {
    let path = path.to_path_buf();
    tokio::task::spawn_blocking(move || hash_file(&path)).await?
}

fn hash_file(path: &Path) -> Result<String> {
    let mut file = std::fs::File::open(path).fs_context("opening file for hashing", path)?;
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; 8192];

    loop {
        let n = file
            .read(&mut buffer)
            .fs_context("reading file for hash calculation", path)?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }

    Ok(hex::encode(hasher.finalize()))
}

/// Path of the sidecar that belongs to `artifact`.
pub fn sidecar_path(artifact: &Path) -> PathBuf {
    let mut name = artifact.as_os_str().to_owned();
    name.push(SIDECAR_SUFFIX);
    PathBuf::from(name)
}

/// One parsed sidecar line.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SidecarRecord {
    /// Lowercase hex digest
    pub digest: String,
    /// File name the digest was computed for
    pub file_name: String,
}

impl SidecarRecord {
    pub fn new(digest: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            digest: digest.into().to_ascii_lowercase(),
            file_name: file_name.into(),
        }
    }

    /// Parse the first non-empty line of a sidecar.
    ///
    /// Returns `None` when the content does not look like checksum tool output.
    pub fn parse(content: &str) -> Option<Self> {
        let line = content.lines().find(|l| !l.trim().is_empty())?;
        let captures = SIDECAR_LINE.captures(line.trim_end())?;
        Some(Self::new(&captures[1], &captures[2]))
    }

    /// Render in checksum tool text format, newline terminated.
    pub fn to_line(&self) -> String {
        format!("{}  {}\n", self.digest, self.file_name)
    }
}

/// Hash `artifact` and write `<artifact>.sha256sum` next to it.
///
/// The record names the artifact by file name only, so the sidecar stays
/// valid after both files are moved together.
pub async fn write_sidecar(artifact: &Path) -> Result<(PathBuf, SidecarRecord)> {
    let digest = calculate_sha256(artifact).await?;
    let file_name = artifact
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let record = SidecarRecord::new(digest, file_name);

    let path = sidecar_path(artifact);
    tokio::fs::write(&path, record.to_line())
        .await
        .fs_context("writing checksum file", &path)?;

    log::debug!("Wrote {} ({})", path.display(), record.digest);
    Ok((path, record))
}
