//! Top-level error wrapper types.

#[cfg(feature = "database")]
use crate::DatabaseError;
use crate::{
    ConfigError, EmptyThreadError, InvalidStateError, JsonError, NotFoundError, PostingError,
};

/// Every failure a Herald operation can surface.
///
/// # Examples
///
/// ```
/// use herald_error::{HeraldError, EmptyThreadError};
///
/// let err: HeraldError = EmptyThreadError::new("no content").into();
/// assert!(format!("{}", err).contains("Empty Thread"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum HeraldErrorKind {
    /// Content record or draft does not exist
    #[from(NotFoundError)]
    NotFound(NotFoundError),
    /// Required configuration is missing or invalid
    #[from(ConfigError)]
    Config(ConfigError),
    /// Nothing to segment or publish
    #[from(EmptyThreadError)]
    EmptyThread(EmptyThreadError),
    /// Publish requested from a non-publishable status
    #[from(InvalidStateError)]
    InvalidState(InvalidStateError),
    /// Posting platform failed after backoff
    #[from(PostingError)]
    ExternalService(PostingError),
    /// JSON serialization/deserialization error
    #[from(JsonError)]
    Json(JsonError),
    /// Database error
    #[cfg(feature = "database")]
    #[from(DatabaseError)]
    Database(DatabaseError),
}

/// Herald error with kind discrimination.
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Herald Error: {}", _0)]
pub struct HeraldError(Box<HeraldErrorKind>);

impl HeraldError {
    /// Create a new error from a kind.
    pub fn new(kind: HeraldErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &HeraldErrorKind {
        &self.0
    }

    /// True when the caller asked for something impossible, false when
    /// Herald's own action (platform call, database) failed.
    pub fn is_client_error(&self) -> bool {
        matches!(
            *self.0,
            HeraldErrorKind::NotFound(_)
                | HeraldErrorKind::Config(_)
                | HeraldErrorKind::EmptyThread(_)
                | HeraldErrorKind::InvalidState(_)
                | HeraldErrorKind::Json(_)
        )
    }
}

// Generic From implementation for any type that converts to HeraldErrorKind
impl<T> From<T> for HeraldError
where
    T: Into<HeraldErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Herald operations.
pub type HeraldResult<T> = std::result::Result<T, HeraldError>;
