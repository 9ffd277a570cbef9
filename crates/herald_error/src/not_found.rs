//! Missing record errors.

/// A content record or thread draft that does not exist.
///
/// # Examples
///
/// ```
/// use herald_error::NotFoundError;
///
/// let err = NotFoundError::new("thread draft", "draft_42");
/// assert_eq!(err.entity, "thread draft");
/// assert!(format!("{}", err).contains("draft_42"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Not Found: {} '{}' at line {} in {}", entity, id, line, file)]
pub struct NotFoundError {
    /// Kind of record that was looked up
    pub entity: &'static str,
    /// Identifier that was looked up
    pub id: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl NotFoundError {
    /// Create a new NotFoundError at the current location.
    #[track_caller]
    pub fn new(entity: &'static str, id: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            entity,
            id: id.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}
