/*! Logging setup.

The conversions in this crate never log; [`AmConfigClient`][crate::amconfig::client::AmConfigClient]
emits `debug` events for each request. Plugin hosts such as Terraform read
structured logs from stderr, so [`layer`] writes JSON lines there.
*/
use std::io;

use tracing_subscriber::{
    fmt::format::{Format, Json, JsonFields},
    prelude::*,
    registry::LookupSpan,
    util::TryInitError,
    EnvFilter,
};

/// Create a `tracing` [`Layer`][tracing_subscriber::Layer] that logs events as JSON to stderr.
///
/// # Example
///
/// ```rust
/// use grafana_amconfig::log;
/// use tracing_subscriber::{prelude::*, EnvFilter};
///
/// tracing_subscriber::registry()
///     .with(log::layer())
///     .with(EnvFilter::from_default_env())
///     .init();
/// ```
pub fn layer<S: tracing::Subscriber + for<'a> LookupSpan<'a>>(
) -> tracing_subscriber::fmt::Layer<S, JsonFields, Format<Json>, fn() -> io::Stderr> {
    tracing_subscriber::fmt::layer()
        .json()
        .with_current_span(false)
        .with_writer(io::stderr as fn() -> io::Stderr)
}

/// Install [`layer`] as the global subscriber, filtered by `RUST_LOG` and
/// defaulting to `info`.
///
/// # Errors
///
/// Returns an error if a global subscriber has already been installed.
pub fn init_subscriber() -> Result<(), TryInitError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(layer())
        .try_init()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn second_init_fails() {
        // Another test may have installed a subscriber first.
        let _ = init_subscriber();
        assert!(init_subscriber().is_err());
    }
}
