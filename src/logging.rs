//! Structured logging setup.

use tracing_subscriber::{fmt, EnvFilter};

/// Default filter for a `-v` count; `quiet` wins over any verbosity.
pub fn default_filter(verbosity: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbosity {
        0 => "warn",
        1 => "wgsldoc=info,warn",
        2 => "wgsldoc=debug,info",
        _ => "trace",
    }
}

/// Initialize logging to stderr.
///
/// Use the `RUST_LOG` environment variable to override the default filter.
pub fn init_logging(verbosity: u8, quiet: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbosity, quiet)));

    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter() {
        assert_eq!(default_filter(0, false), "warn");
        assert_eq!(default_filter(1, false), "wgsldoc=info,warn");
        assert_eq!(default_filter(5, false), "trace");
        assert_eq!(default_filter(3, true), "error");
    }
}
