//! Trait definitions for Herald.
//!
//! The publishing pipeline talks to persistence and to the posting platform
//! only through these traits, so stores and clients can be swapped for
//! in-memory doubles in tests.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod posting;
mod store;

pub use posting::PostingClient;
pub use store::{ContentStore, DraftStore, PostUnitStore, ThreadStore};
