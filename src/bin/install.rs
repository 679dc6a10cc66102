//! `relkit-install`: download, verify and install a released binary.

use std::process;

use clap::Parser;
use relkit::cli::{InstallArgs, OutputManager, init_logging, usage_exit_code};
use relkit::install::{InstallError, InstallOutcome, InstallResult, Installer};
use relkit::signal::run_interruptible;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = match InstallArgs::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            process::exit(usage_exit_code(&e));
        }
    };

    init_logging(args.quiet);
    let output = OutputManager::new(args.verbose, args.quiet);

    let result = match run_interruptible(install(&args, &output)).await {
        Ok(result) => result,
        Err(signal) => Err(InstallError::Interrupted(signal)),
    };

    let exit_code = match result {
        Ok(outcome) => {
            if let Some(warning) = outcome.warning {
                let _ = output.warn(&warning.to_string());
            }
            0
        }
        Err(e) => {
            let _ = output.error(&e.to_string());
            e.exit_code()
        }
    };

    process::exit(exit_code);
}

async fn install(args: &InstallArgs, output: &OutputManager) -> InstallResult<InstallOutcome> {
    let config = args.to_config()?;
    let installer = Installer::with_default_fetchers(config, output.clone())?;
    installer.run().await
}
