//! Thread publishing pipeline for Herald.
//!
//! A newsletter content record travels through four stages:
//! - [`TextNormalizer`] cleans raw editorial fields into single-line text
//! - [`ThreadSegmenter`] turns the record into numbered, length-bounded posts
//! - [`DraftManager`] persists those posts as an idempotent thread draft
//! - [`PublishOrchestrator`] drives the posting platform to completion,
//!   recording every platform id so an interrupted run can resume
//!
//! Every platform call goes through the `herald_rate_limit` backoff
//! controller.
//!
//! # Platform Support
//!
//! - `x` - X API v2 client (default feature)

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod draft;
mod locks;
mod publish;
mod segmenter;
mod text;

#[cfg(feature = "x")]
mod x;

pub use draft::DraftManager;
pub use locks::DraftLocks;
pub use publish::PublishOrchestrator;
pub use segmenter::ThreadSegmenter;
pub use text::{TextNormalizer, cap_to_length};

#[cfg(feature = "x")]
pub use x::XClient;
