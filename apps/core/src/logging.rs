//! Tracing subscriber setup.
//!
//! Logs always go to stderr so they never interleave with the chat on stdout.
//! `RUST_LOG` takes precedence over the level derived from `-v`/`-q`.

use tracing_subscriber::EnvFilter;

use crate::config::LogFormat;

/// Initializes the global subscriber. Safe to call more than once; later calls are ignored.
pub fn init_tracing(format: LogFormat, default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    let result = match format {
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };

    if let Err(e) = result {
        eprintln!("Tracing already initialized: {}", e);
    }
}
