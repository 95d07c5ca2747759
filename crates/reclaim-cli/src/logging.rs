//! Tracing subscriber setup.

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Filter directive for the configured level raised by `-v` flags.
pub fn filter_directive(configured: Level, verbose: u8) -> String {
    let level = match verbose {
        0 => configured,
        1 => Level::DEBUG.max(configured),
        _ => Level::TRACE,
    };
    level.to_string().to_lowercase()
}

/// Install the global subscriber, logging to stderr.
///
/// `RUST_LOG` takes precedence over the configured level.
pub fn init(configured: Level, verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_directive(configured, 0))),
        _ => EnvFilter::new(filter_directive(configured, verbose)),
    };

    // Ignore the error if a subscriber is already set (e.g. in tests)
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_directive() {
        assert_eq!(filter_directive(Level::INFO, 0), "info");
        assert_eq!(filter_directive(Level::WARN, 0), "warn");
        assert_eq!(filter_directive(Level::INFO, 1), "debug");
        assert_eq!(filter_directive(Level::TRACE, 1), "trace");
        assert_eq!(filter_directive(Level::ERROR, 3), "trace");
    }
}
