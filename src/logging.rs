use tracing_subscriber::EnvFilter;

/// Crate log level for a `-v` count: warn, info, debug, then trace
pub fn level_for(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Initialize tracing (log to stderr).
///
/// `RUST_LOG` wins when set; otherwise the level follows `verbosity`.
/// Calling this twice is harmless.
pub fn init(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("git_autotag={}", level_for(verbosity))));

    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
