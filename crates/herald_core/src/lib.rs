//! Core data types for Herald.
//!
//! This crate provides the records shared by every Herald crate: the
//! newsletter content record read from the CMS, the thread draft and its post
//! units, the values exchanged with a posting platform, and the explicit
//! [`HeraldConfig`] handed to each component at construction.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod content;
mod draft;
mod posting;
mod unit;

pub use config::{
    HeraldConfig, LogFormat, LoggingConfig, PublishConfig, SiteConfig, ThreadConfig, XConfig,
};
pub use content::{ContentRecord, ContentRecordBuilder, ContentRecordBuilderError, ContentStatus};
pub use draft::{
    DraftStatus, DraftSummary, DraftUpdate, NewThreadDraft, NewThreadDraftBuilder,
    NewThreadDraftBuilderError, PostingMode, ThreadDraft, ThreadWithUnits, draft_id_for,
};
pub use posting::{ImageSource, MediaRef, PostedUnit, PublishOutcome};
pub use unit::{NewPostUnit, PostUnit, PostUnitUpdate};

/// Platform name recorded on every draft.
pub const PLATFORM_X: &str = "X";
