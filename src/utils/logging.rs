use std::str::FromStr;

use tracing::Level;

/// Initialize tracing/logging for the host application.
///
/// Parses `default_level` ("error", "warn", "info", "debug", "trace");
/// anything unrecognized falls back to `info`.
pub fn init(default_level: &str) {
    let level = Level::from_str(default_level).unwrap_or(Level::INFO);

    // Use try_init so tests and libraries can call this multiple times without panicking
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::init;

    #[test]
    fn logging_init_accepts_levels() {
        // Should not panic, including on repeated calls
        init("info");
        init("debug");
        init("not-a-level");
    }
}
