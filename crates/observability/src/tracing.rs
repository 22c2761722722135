//! Tracing/logging initialization.

use tracing_subscriber::EnvFilter;

/// Initialize tracing for the process.
///
/// Filtering follows `RUST_LOG` and defaults to `info`. Logs go to stderr
/// so stdout stays clean for command output; set `TRADEGATE_LOG_JSON=1` for
/// machine-readable JSON lines instead. Safe to call multiple times
/// (subsequent calls are no-ops).
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    if json_logs_requested() {
        let _ = builder.json().try_init();
    } else {
        let _ = builder.try_init();
    }
}

fn json_logs_requested() -> bool {
    std::env::var("TRADEGATE_LOG_JSON")
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}
