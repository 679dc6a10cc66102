//! Command line surface shared by `relkit-install` and `relkit-release`.

mod args;
mod output;

pub use args::{InstallArgs, ReleaseArgs, usage_exit_code};
pub use output::{OutputManager, WARNING_PREFIX};

/// Environment variable that switches logging to debug level.
pub const DEBUG_ENV: &str = "RELKIT_DEBUG";

/// Initialize `env_logger` once for the process.
///
/// The base level is `info` (`warn` when `quiet`), raised to `debug` when
/// `RELKIT_DEBUG` is non-empty. `RUST_LOG` directives are applied on top.
pub fn init_logging(quiet: bool) {
    let debug = std::env::var_os(DEBUG_ENV).is_some_and(|value| !value.is_empty());
    let level = match (debug, quiet) {
        (true, _) => log::LevelFilter::Debug,
        (false, true) => log::LevelFilter::Warn,
        (false, false) => log::LevelFilter::Info,
    };

    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(level)
        .format_timestamp(None)
        .format_target(false)
        .parse_env(env_logger::Env::default());

    if builder.try_init().is_err() {
        log::debug!("Logger already initialized");
    }
}
