//! Command line argument parsing for both binaries.

use std::path::PathBuf;

use clap::Parser;

use crate::install::config::{
    DEFAULT_BASE_URL, DEFAULT_BINARY, DEFAULT_INSTALL_DIR, DEFAULT_VERSION_ARG,
};
use crate::install::{InstallConfig, InstallResult, Version};
use crate::platform::HostInfo;
use crate::release::ReleaseOverrides;

/// Exit status for a clap parse failure.
///
/// Help and version output exit 0; every usage error exits 1.
pub fn usage_exit_code(err: &clap::Error) -> i32 {
    if err.use_stderr() { 1 } else { 0 }
}

/// Download, verify and install a released binary
#[derive(Parser, Debug)]
#[command(
    name = "relkit-install",
    version,
    about = "Download, verify and install a released binary",
    long_about = "Downloads the release archive for this host together with its .sha256sum \
sidecar, verifies the digest, and installs the binary.

Usage:
  relkit-install
  relkit-install -v 1.2.3
  relkit-install -t linux-386 --install-dir ~/.local/bin

Exit codes: 0 ok, 1 bad argument, 2 unsupported OS, 3 unsupported architecture,
4 unknown archive format, 6 download unavailable, 99 other failure."
)]
pub struct InstallArgs {
    /// Release to install: `latest` or a release tag such as `v1.2.3`
    #[arg(short = 'v', long = "release-version", value_name = "VERSION")]
    pub release_version: Option<String>,

    /// Install the build for `<os>-<arch>` instead of the host's
    #[arg(short = 't', long, value_name = "TARGET")]
    pub target: Option<String>,

    /// Program to install
    #[arg(long, env = "RELKIT_BINARY", default_value = DEFAULT_BINARY)]
    pub binary: String,

    /// Releases base URL
    #[arg(long, env = "RELKIT_RELEASES_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Directory the binary is installed into
    #[arg(long, env = "RELKIT_INSTALL_DIR", default_value = DEFAULT_INSTALL_DIR)]
    pub install_dir: PathBuf,

    /// Directory the archive and sidecar are saved to
    #[arg(long, env = "RELKIT_DOWNLOAD_DIR", default_value = ".")]
    pub download_dir: PathBuf,

    /// Parent of the temporary working directory
    #[arg(long, env = "RELKIT_TMPDIR", hide = true)]
    pub scratch_dir: Option<PathBuf>,

    /// Argument passed to the installed binary as a smoke test
    #[arg(long, allow_hyphen_values = true, default_value = DEFAULT_VERSION_ARG)]
    pub version_arg: String,

    #[arg(long, env = "RELKIT_HOST_OS", hide = true)]
    pub host_os: Option<String>,

    #[arg(long, env = "RELKIT_HOST_ARCH", hide = true)]
    pub host_arch: Option<String>,

    /// Print additional detail for each stage
    #[arg(long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only print warnings and errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl InstallArgs {
    /// Validated install settings.
    pub fn to_config(&self) -> InstallResult<InstallConfig> {
        let version = match self.release_version.as_deref() {
            Some(raw) => Version::parse(raw)?,
            None => Version::Latest,
        };

        InstallConfig {
            binary: self.binary.clone(),
            version,
            target_override: self.target.clone(),
            host: HostInfo::current_with(self.host_os.as_deref(), self.host_arch.as_deref()),
            base_url: self.base_url.clone(),
            install_dir: self.install_dir.clone(),
            download_dir: self.download_dir.clone(),
            scratch_parent: self.scratch_dir.clone(),
            version_arg: self.version_arg.clone(),
        }
        .validated()
    }
}

/// Build, package, tag and push a cross-compiled release
#[derive(Parser, Debug)]
#[command(
    name = "relkit-release",
    version,
    about = "Build, package, tag and push a cross-compiled release",
    long_about = "Cross-compiles the program for darwin, linux and windows on amd64 and 386, \
archives each binary with a .sha256sum sidecar, then creates and pushes an annotated tag \
named after the manifest version.

Settings are read from [package.metadata.release] in the manifest; flags override them.

Exit codes: 0 ok, 1 bad argument, 127 not on the release branch, 99 other failure."
)]
pub struct ReleaseArgs {
    /// Manifest holding the version and release settings
    #[arg(long, value_name = "PATH", default_value = "Cargo.toml")]
    pub manifest: PathBuf,

    /// Branch releases must be made from
    #[arg(long)]
    pub branch: Option<String>,

    /// Name of the produced binary
    #[arg(long)]
    pub binary: Option<String>,

    /// Module path handed to the compile-matrix tool
    #[arg(long)]
    pub module: Option<String>,

    /// Output directory for binaries and archives
    #[arg(long, value_name = "DIR")]
    pub dist_dir: Option<PathBuf>,

    /// Remote the tag is pushed to
    #[arg(long)]
    pub remote: Option<String>,

    /// Compile-matrix tool
    #[arg(long, value_name = "PROGRAM")]
    pub matrix_tool: Option<String>,

    /// Command that installs the compile-matrix tool when it is missing
    #[arg(long, value_name = "COMMAND")]
    pub matrix_install: Option<String>,

    /// Create the tag but do not push it
    #[arg(long)]
    pub skip_push: bool,

    /// Print additional detail for each stage
    #[arg(long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only print warnings and errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl ReleaseArgs {
    pub fn overrides(&self) -> ReleaseOverrides {
        ReleaseOverrides {
            branch: self.branch.clone(),
            binary: self.binary.clone(),
            module: self.module.clone(),
            dist_dir: self.dist_dir.clone(),
            remote: self.remote.clone(),
            matrix_tool: self.matrix_tool.clone(),
            matrix_install: self.matrix_install.clone(),
            skip_push: self.skip_push,
        }
    }
}
