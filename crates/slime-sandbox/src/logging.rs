use env_logger::{Builder, Env};
use log::LevelFilter;

/// Install the global logger.
///
/// `RUST_LOG` wins when set. Otherwise `verbose` shows debug messages
/// (restarts, ignored commands) and the default shows info and above,
/// which includes everything scripts `print`.
pub fn init(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let env = Env::default().default_filter_or(level.to_string());
    // Fails only when a logger is already installed, e.g. across tests.
    let _ = Builder::from_env(env).try_init();
}
