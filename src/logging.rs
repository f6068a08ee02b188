use env_logger::{Builder, Env};
use log::LevelFilter;

/// Initializes the global logger.
///
/// `verbose` lowers the default filter from info to debug, which prints one
/// line per simulated tick. `RUST_LOG` takes precedence when set.
pub fn init(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let env = Env::default().default_filter_or(level.to_string());
    // Only fails when a logger is already installed.
    let _ = Builder::from_env(env).format_timestamp(None).try_init();
}
