use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "TRUSTSCAN_LOG";

/// Filter used when `TRUSTSCAN_LOG` is not set.
pub fn default_directive(verbose: bool, quiet: bool) -> &'static str {
    if quiet {
        "error"
    } else if verbose {
        "trustscan=debug,warn"
    } else {
        "warn"
    }
}

/// Installs the stderr subscriber. A second call is a no-op.
pub fn init(verbose: bool, quiet: bool) {
    let env_filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose, quiet)));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
