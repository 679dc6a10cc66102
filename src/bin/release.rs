//! `relkit-release`: build, package, tag and push a release.

use std::process;

use anyhow::Context;
use clap::Parser;
use path_absolutize::Absolutize;
use relkit::cli::{OutputManager, ReleaseArgs, init_logging, usage_exit_code};
use relkit::metadata::load_manifest;
use relkit::release::{ReleaseConfig, ReleaseError, Releaser};
use relkit::signal::run_interruptible;

/// Exit status for failures before the pipeline starts.
const SETUP_FAILURE: i32 = 99;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = match ReleaseArgs::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            process::exit(usage_exit_code(&e));
        }
    };

    init_logging(args.quiet);
    let output = OutputManager::new(args.verbose, args.quiet);

    let config = match prepare(&args) {
        Ok(config) => config,
        Err(e) => {
            let _ = output.error(&format!("{e:#}"));
            process::exit(SETUP_FAILURE);
        }
    };

    let releaser = Releaser::new(config, output.clone());
    let result = match run_interruptible(releaser.run()).await {
        Ok(result) => result,
        Err(signal) => Err(ReleaseError::Interrupted(signal)),
    };

    let exit_code = match result {
        Ok(_) => 0,
        Err(e) => {
            let _ = output.error(&e.to_string());
            e.exit_code()
        }
    };

    process::exit(exit_code);
}

/// Load the manifest and merge it with the command line.
fn prepare(args: &ReleaseArgs) -> anyhow::Result<ReleaseConfig> {
    let manifest_path = args
        .manifest
        .absolutize()
        .context("Failed to resolve manifest path")?
        .into_owned();
    let repo_dir = manifest_path
        .parent()
        .context("Manifest path has no parent directory")?
        .to_path_buf();

    let manifest = load_manifest(&manifest_path)
        .with_context(|| format!("Failed to load {}", manifest_path.display()))?;
    log::debug!("Loaded {} {}", manifest.name, manifest.version);

    let config = ReleaseConfig::resolve(&repo_dir, &manifest, args.overrides())?;
    Ok(config)
}
