//! Configuration error types.

/// Missing or invalid settings, or a request that cannot be resolved from them.
///
/// Raised at startup by configuration validation and at draft time when no
/// call-to-action link can be built. Always a client error.
///
/// # Examples
///
/// ```
/// use herald_error::{ConfigError, HeraldError, HeraldErrorKind};
///
/// let err: HeraldError = ConfigError::new("x.access_token is not configured").into();
/// assert!(err.is_client_error());
/// match err.kind() {
///     HeraldErrorKind::Config(config) => {
///         assert!(config.message.starts_with("x.access_token"));
///         assert!(config.file.ends_with(".rs"));
///     }
///     other => panic!("unexpected kind: {}", other),
/// }
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Configuration Error: {} at line {} in {}", message, line, file)]
pub struct ConfigError {
    /// Error message
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl ConfigError {
    /// Create a new ConfigError at the current location.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}
