//! Tracing subscriber setup for the binary.

use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is unset or unparsable.
const DEFAULT_FILTER: &str = "tariff_rater=info";

/// Installs a fmt subscriber writing to stderr, filtered by `RUST_LOG`.
///
/// Stdout is left for the bill report. Calling this more than once is a no-op.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_parses() {
        assert!(DEFAULT_FILTER.parse::<tracing_subscriber::filter::Directive>().is_ok());
    }

    #[test]
    fn repeated_init_does_not_panic() {
        init_tracing();
        init_tracing();
    }
}
