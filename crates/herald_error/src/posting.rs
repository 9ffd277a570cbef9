//! Posting platform error types.

/// Posting platform failure conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum PostingErrorKind {
    /// The platform answered with a non-success status.
    #[display("HTTP {}: {}", status_code, message)]
    Http {
        /// HTTP status code
        status_code: u16,
        /// Response body or reason
        message: String,
        /// Unix timestamp at which the platform's rate window resets, if reported
        rate_limit_reset: Option<i64>,
    },
    /// The request never produced a response (connect, TLS, timeout).
    #[display("Transport error: {}", _0)]
    Transport(String),
    /// The response body did not have the expected shape.
    #[display("Unexpected response: {}", _0)]
    Decode(String),
    /// An attached image could not be read or encoded.
    #[display("Media error: {}", _0)]
    Media(String),
}

const THROTTLE_MARKERS: &[&str] = &["rate limit", "too many requests", "throttl"];

impl PostingErrorKind {
    /// HTTP status code, when the platform returned one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Http { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }

    /// True for HTTP 429 or a message that mentions throttling.
    pub fn is_rate_limited(&self) -> bool {
        let message = match self {
            Self::Http {
                status_code: 429, ..
            } => return true,
            Self::Http { message, .. } => message,
            Self::Transport(message) | Self::Decode(message) => message,
            Self::Media(_) => return false,
        };
        let lowered = message.to_lowercase();
        THROTTLE_MARKERS.iter().any(|marker| lowered.contains(marker))
    }
}

/// Posting platform error with source location tracking.
///
/// # Examples
///
/// ```
/// use herald_error::{PostingError, PostingErrorKind, RateLimitedError};
///
/// let err = PostingError::new(PostingErrorKind::Http {
///     status_code: 429,
///     message: "Too Many Requests".to_string(),
///     rate_limit_reset: None,
/// });
/// assert!(err.is_rate_limited());
/// assert_eq!(err.kind.status_code(), Some(429));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Posting Error: {} at line {} in {}", kind, line, file)]
pub struct PostingError {
    /// The kind of error that occurred
    pub kind: PostingErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl PostingError {
    /// Create a new PostingError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: PostingErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

/// Result type for posting platform calls.
pub type PostingResult<T> = Result<T, PostingError>;

/// Errors that can tell whether the remote side throttled the request.
///
/// The backoff controller retries only errors that report `true`.
pub trait RateLimitedError {
    /// Returns true if this error means "slow down and try again".
    fn is_rate_limited(&self) -> bool;
}

impl RateLimitedError for PostingError {
    fn is_rate_limited(&self) -> bool {
        self.kind.is_rate_limited()
    }
}
