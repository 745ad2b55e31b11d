//! Structured logging setup.
//!
//! The library only emits `tracing` events; binaries call [`init_logging`]
//! once at startup. `RUST_LOG` takes precedence over the default filter.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Installs a formatted subscriber filtered at `info` unless `RUST_LOG` is set.
pub fn init_logging() {
    init_logging_with("info");
}

/// Installs a formatted subscriber with `default_filter` as the fallback
/// directive.
///
/// Does nothing if a global subscriber is already set.
pub fn init_logging_with(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into());
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_init_is_harmless() {
        init_logging_with("debug");
        init_logging();
        tracing::info!("logging initialized twice");
    }
}
