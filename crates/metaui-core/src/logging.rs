//! Logging bootstrap based on `tracing-subscriber`.

use tracing_subscriber::EnvFilter;

/// Default filter directive when neither `RUST_LOG` nor an explicit filter is given.
pub const DEFAULT_FILTER: &str = "info";

/// Install the global fmt subscriber.
///
/// `RUST_LOG` wins over [`DEFAULT_FILTER`]. Panics if a global subscriber is
/// already set; use [`try_init`] in tests.
pub fn init() {
    init_with_filter(DEFAULT_FILTER);
}

/// Install the global fmt subscriber with a fallback filter directive.
pub fn init_with_filter(default_filter: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(default_filter))
        .init();
}

/// Like [`init_with_filter`] but returns `false` instead of panicking when a
/// subscriber is already installed.
pub fn try_init(default_filter: &str) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(default_filter))
        .with_test_writer()
        .try_init()
        .is_ok()
}

fn env_filter(default_filter: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_init_twice() {
        let _ = try_init("debug");
        // Second install must not panic
        assert!(!try_init("debug"));
    }
}
