//! Structured logging setup for fixture generation
//!
//! Generation emits `tracing` events unconditionally: a `debug` span around
//! each [`random_bcoo_with`](crate::random_bcoo_with) call with the resolved
//! partition, and `trace` events from the batched sampler. Nothing is printed
//! until a subscriber is installed; [`init_tracing`] installs one when the
//! `tracing` feature is enabled and is a no-op otherwise.
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: filter directive (default `spfix_sparse=info,warn`)
//! - `SPFIX_LOG_FORMAT`: `pretty`, `json` or `compact` (default `pretty`)
//!
//! # Example
//!
//! ```
//! use spfix_sparse::tracing_support::{init_tracing, TracingConfig, TracingFormat};
//!
//! let config = TracingConfig {
//!     format: TracingFormat::Compact,
//!     filter: "spfix_sparse=debug".to_string(),
//!     with_ansi: false,
//!     with_target: false,
//! };
//! init_tracing(config).unwrap();
//! ```

use anyhow::Result;

#[cfg(feature = "tracing")]
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Tracing output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TracingFormat {
    /// Pretty-printed human-readable format
    Pretty,
    /// JSON format for structured logging
    Json,
    /// Single line per event
    Compact,
}

impl TracingFormat {
    /// Parse from string; unknown values fall back to `Pretty`
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => TracingFormat::Json,
            "compact" => TracingFormat::Compact,
            _ => TracingFormat::Pretty,
        }
    }
}

/// Tracing configuration
#[derive(Debug, Clone)]
pub struct TracingConfig {
    pub format: TracingFormat,
    /// Filter directive (e.g. "spfix_sparse=debug,info")
    pub filter: String,
    /// Colored output; ignored by the JSON format
    pub with_ansi: bool,
    /// Include the event target (module path)
    pub with_target: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        let format = std::env::var("SPFIX_LOG_FORMAT")
            .map(|s| TracingFormat::parse(&s))
            .unwrap_or(TracingFormat::Pretty);

        let filter =
            std::env::var("RUST_LOG").unwrap_or_else(|_| "spfix_sparse=info,warn".to_string());

        Self {
            format,
            filter,
            with_ansi: true,
            with_target: true,
        }
    }
}

/// Install a global subscriber for `config`
///
/// Call once at startup. A second call, or a call after another subscriber
/// was installed, returns an error rather than replacing it.
#[cfg(feature = "tracing")]
pub fn init_tracing(config: TracingConfig) -> Result<()> {
    let filter = EnvFilter::try_new(&config.filter)?;

    match config.format {
        TracingFormat::Pretty => {
            let layer = fmt::layer()
                .pretty()
                .with_ansi(config.with_ansi)
                .with_target(config.with_target)
                .with_filter(filter);
            tracing_subscriber::registry().with(layer).try_init()?;
        }
        TracingFormat::Json => {
            let layer = fmt::layer()
                .json()
                .with_target(config.with_target)
                .with_filter(filter);
            tracing_subscriber::registry().with(layer).try_init()?;
        }
        TracingFormat::Compact => {
            let layer = fmt::layer()
                .compact()
                .with_ansi(config.with_ansi)
                .with_target(config.with_target)
                .with_filter(filter);
            tracing_subscriber::registry().with(layer).try_init()?;
        }
    }

    Ok(())
}

/// No-op without the `tracing` feature
#[cfg(not(feature = "tracing"))]
pub fn init_tracing(_config: TracingConfig) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracing_format_parse() {
        assert_eq!(TracingFormat::parse("json"), TracingFormat::Json);
        assert_eq!(TracingFormat::parse("JSON"), TracingFormat::Json);
        assert_eq!(TracingFormat::parse("compact"), TracingFormat::Compact);
        assert_eq!(TracingFormat::parse("pretty"), TracingFormat::Pretty);
        assert_eq!(TracingFormat::parse("unknown"), TracingFormat::Pretty);
    }

    #[test]
    fn test_default_config() {
        let config = TracingConfig::default();
        assert!(config.with_ansi);
        assert!(config.with_target);
        assert!(!config.filter.is_empty());
    }

    #[cfg(feature = "tracing")]
    #[test]
    fn test_init_installs_once() {
        let config = TracingConfig {
            format: TracingFormat::Json,
            filter: "spfix_sparse=trace".to_string(),
            with_ansi: false,
            with_target: false,
        };
        assert!(init_tracing(config.clone()).is_ok());
        assert!(init_tracing(config).is_err());
    }

    #[cfg(feature = "tracing")]
    #[test]
    fn test_init_rejects_bad_filter() {
        let config = TracingConfig {
            filter: "spfix_sparse=loudest".to_string(),
            ..TracingConfig::default()
        };
        assert!(init_tracing(config).is_err());
    }

    #[cfg(not(feature = "tracing"))]
    #[test]
    fn test_init_stub() {
        assert!(init_tracing(TracingConfig::default()).is_ok());
    }
}
