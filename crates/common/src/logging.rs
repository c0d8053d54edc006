//! Logging and tracing initialization.

use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LoggingConfig;

/// Target used for spoken instructions when no speech engine is attached.
pub const ANNOUNCE_TARGET: &str = "facegym::announce";

/// Filter directives for `level`.
///
/// Announcements stay visible at `info` even when the configured level is
/// quieter, unless `level` already names the announce target.
pub fn filter_directives(level: &str) -> String {
    let level = level.trim();
    let level = if level.is_empty() { "info" } else { level };
    if level.contains(ANNOUNCE_TARGET) {
        level.to_string()
    } else {
        format!("{level},{ANNOUNCE_TARGET}=info")
    }
}

/// Initialize the tracing subscriber once for the process.
///
/// `RUST_LOG` takes precedence over the configured level.
pub fn init_logging(config: &LoggingConfig) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directives(&config.level)));

    let installed = if config.json {
        let subscriber = fmt::Subscriber::builder()
            .with_env_filter(env_filter)
            .json()
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
    } else {
        let subscriber = fmt::Subscriber::builder()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
    };
    if installed.is_err() {
        tracing::debug!("Tracing subscriber already installed");
    }
}

/// Initialize logging with defaults (useful for tests and quick scripts).
pub fn init_default_logging() {
    init_logging(&LoggingConfig::default());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_announcements_kept_at_quiet_levels() {
        assert_eq!(filter_directives("warn"), "warn,facegym::announce=info");
        assert_eq!(filter_directives("  "), "info,facegym::announce=info");
    }

    #[test]
    fn test_explicit_announce_directive_is_respected() {
        let level = "info,facegym::announce=off";
        assert_eq!(filter_directives(level), level);
    }

    #[test]
    fn test_init_twice_does_not_panic() {
        init_default_logging();
        init_default_logging();
    }
}
