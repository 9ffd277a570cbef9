//! PostgreSQL persistence for Herald.
//!
//! [`PostgresThreadRepository`] implements the content, draft and post-unit
//! store traits over the `issues`, `thread_drafts` and `post_units` tables.
//! Schema migrations are managed outside this crate.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod connection;
mod models;
mod repository;
#[allow(missing_docs)]
pub mod schema;

pub use connection::establish_connection;
pub use models::{
    DraftChangeset, IssueRow, NewPostUnitRow, NewThreadDraftRow, PostUnitRow, ThreadDraftRow,
};
pub use repository::PostgresThreadRepository;
