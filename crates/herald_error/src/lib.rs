//! Error types for Herald.
//!
//! This crate provides the error types shared by every Herald crate.
//!
//! # Error Hierarchy
//!
//! Errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enums name specific conditions
//! - `*Error` structs wrap a kind (or message) with source location tracking
//! - constructors use `#[track_caller]` for automatic location capture
//!
//! [`HeraldError`] is the top-level error. [`HeraldError::is_client_error`]
//! separates bad requests (missing records, missing configuration, nothing to
//! publish, wrong draft state) from failures of Herald's own actions
//! (the posting platform, the database).
//!
//! # Examples
//!
//! ```
//! use herald_error::{HeraldResult, NotFoundError};
//!
//! fn load_issue(id: &str) -> HeraldResult<String> {
//!     Err(NotFoundError::new("content record", id).into())
//! }
//!
//! let err = load_issue("issue_1").unwrap_err();
//! assert!(err.is_client_error());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
#[cfg(feature = "database")]
mod database;
mod error;
mod json;
mod not_found;
mod posting;
mod thread;

pub use config::ConfigError;
#[cfg(feature = "database")]
pub use database::{DatabaseError, DatabaseErrorKind};
pub use error::{HeraldError, HeraldErrorKind, HeraldResult};
pub use json::JsonError;
pub use not_found::NotFoundError;
pub use posting::{PostingError, PostingErrorKind, PostingResult, RateLimitedError};
pub use thread::{EmptyThreadError, InvalidStateError};
