//! Tracing/logging initialization for the CLI.

use tracing_subscriber::EnvFilter;

use crate::constants::{ENV_LOG, ENV_LOG_FORMAT};

/// Initializes the subscriber; `-v` flags override the `CUMULUS_LOG`
/// env filter, and `CUMULUS_LOG_FORMAT=json` switches to JSON lines.
/// Logs always go to stderr so they never mix with rendered responses.
pub fn init_tracing(verbosity: u8) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let level = match verbosity {
        0 => std::env::var(ENV_LOG).unwrap_or_else(|_| "error".to_string()),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    };
    let env_filter = EnvFilter::try_new(&level)
        .or_else(|_| EnvFilter::try_new("error"))
        .unwrap_or_else(|_| EnvFilter::new("error"));

    let json = std::env::var(ENV_LOG_FORMAT)
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        let layer = tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_writer(std::io::stderr);
        tracing_subscriber::registry()
            .with(env_filter)
            .with(layer)
            .init();
    } else {
        let layer = tracing_subscriber::fmt::layer()
            .with_target(true)
            .without_time()
            .with_writer(std::io::stderr);
        tracing_subscriber::registry()
            .with(env_filter)
            .with(layer)
            .init();
    }
}
