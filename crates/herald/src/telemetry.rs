//! Tracing subscriber setup.

use herald_core::{LogFormat, LoggingConfig};
use herald_error::{ConfigError, HeraldResult};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when neither `RUST_LOG` nor `logging.filter` is set.
pub const DEFAULT_FILTER: &str = "info,herald=debug";

/// Filter installed by `--verbose`.
pub const VERBOSE_FILTER: &str = "debug";

/// Build the event filter.
///
/// Precedence: `verbose`, then `RUST_LOG`, then `logging.filter`, then
/// [`DEFAULT_FILTER`].
pub fn build_filter(config: &LoggingConfig, verbose: bool) -> HeraldResult<EnvFilter> {
    if verbose {
        return Ok(EnvFilter::new(VERBOSE_FILTER));
    }
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    let directives = config.filter.as_deref().unwrap_or(DEFAULT_FILTER);
    EnvFilter::try_new(directives).map_err(|e| {
        ConfigError::new(format!("Invalid logging.filter '{}': {}", directives, e)).into()
    })
}

/// Install the global subscriber.
///
/// Events go to stderr so command output on stdout stays machine-readable.
///
/// # Errors
///
/// `ConfigError` for an invalid filter or when a subscriber is already set.
pub fn init_telemetry(config: &LoggingConfig, verbose: bool) -> HeraldResult<()> {
    let filter = build_filter(config, verbose)?;
    let registry = tracing_subscriber::registry().with(filter);

    let installed = match config.format {
        LogFormat::Text => registry
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
    };

    installed
        .map_err(|e| ConfigError::new(format!("Failed to install tracing subscriber: {}", e)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_overrides_configured_filter() {
        let config = LoggingConfig {
            filter: Some("warn".to_string()),
            ..LoggingConfig::default()
        };

        let filter = build_filter(&config, true).unwrap();
        assert_eq!(filter.to_string(), VERBOSE_FILTER);
    }

    #[test]
    fn verbose_skips_invalid_configured_filter() {
        let config = LoggingConfig {
            filter: Some("herald=notalevel".to_string()),
            ..LoggingConfig::default()
        };

        assert!(build_filter(&config, true).is_ok());
    }
}
