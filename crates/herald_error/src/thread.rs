//! Thread lifecycle errors.

/// Segmentation produced nothing to publish.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Empty Thread: {} at line {} in {}", reason, line, file)]
pub struct EmptyThreadError {
    /// Why the thread is empty
    pub reason: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl EmptyThreadError {
    /// Create a new EmptyThreadError at the current location.
    #[track_caller]
    pub fn new(reason: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            reason: reason.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}

/// A draft was asked to publish from a status that does not allow it.
///
/// # Examples
///
/// ```
/// use herald_error::InvalidStateError;
///
/// let err = InvalidStateError::new("draft_7", "published");
/// assert!(format!("{}", err).contains("published"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display(
    "Invalid State: draft '{}' is not publishable from status '{}' at line {} in {}",
    draft_id,
    status,
    line,
    file
)]
pub struct InvalidStateError {
    /// Draft that was asked to publish
    pub draft_id: String,
    /// Status the draft was in
    pub status: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl InvalidStateError {
    /// Create a new InvalidStateError at the current location.
    #[track_caller]
    pub fn new(draft_id: impl Into<String>, status: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            draft_id: draft_id.into(),
            status: status.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}
