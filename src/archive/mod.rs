//! Archive creation (release side) and extraction (install side).
//!
//! Two formats exist, picked by target OS: gzipped tarballs for Linux and ZIP
//! for everything else. The layouts are asymmetric on purpose and the two
//! halves of this module must stay in step:
//!
//! - tar.gz: `<stem>/<stem>`; extraction strips the leading directory
//! - zip: `<stem>[.exe]` at the root; extraction flattens all paths

mod create;
mod extract;

pub use create::{create_archive, create_tar_gz, create_zip};
pub use extract::{extract_archive, extract_archive_cancellable, extract_tar_gz, extract_zip};

use std::fmt;

use crate::platform::PlatformError;

/// Compressed archive formats used for release artifacts.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ArchiveFormat {
    /// gzip-compressed tarball (`.tar.gz`)
    TarGz,
    /// ZIP archive (`.zip`)
    Zip,
}

impl ArchiveFormat {
    /// File extension without the leading dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::TarGz => "tar.gz",
            Self::Zip => "zip",
        }
    }

    /// Infer the format from a file name.
    ///
    /// # Errors
    ///
    /// [`PlatformError::UnknownArchiveFormat`] when the name ends in neither
    /// `.tar.gz` / `.tgz` nor `.zip`.
    pub fn from_file_name(name: &str) -> Result<Self, PlatformError> {
        let lower = name.to_ascii_lowercase();
        if lower.ends_with(".tar.gz") || lower.ends_with(".tgz") {
            Ok(Self::TarGz)
        } else if lower.ends_with(".zip") {
            Ok(Self::Zip)
        } else {
            Err(PlatformError::UnknownArchiveFormat(name.to_string()))
        }
    }
}

impl fmt::Display for ArchiveFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}
