//! Values exchanged with a posting platform.

use crate::{DraftStatus, PostingMode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Platform media identifier returned by an image upload.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
#[display("{}", _0)]
pub struct MediaRef(pub String);

/// A post the platform accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostedUnit {
    /// Platform-assigned id
    pub external_id: String,
    /// Text as echoed back by the platform
    pub text: String,
}

/// Image to attach to the root post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageSource {
    /// Base64 payload, optionally as a `data:` URL
    Base64(String),
    /// Publicly reachable image URL
    Url(String),
}

/// What a publish request did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PublishOutcome {
    /// Preview only: nothing was sent or written
    DryRun {
        /// Draft id
        draft_id: String,
        /// Current status
        status: DraftStatus,
        /// Segmentation mode
        mode: PostingMode,
        /// Unit texts in posting order
        texts: Vec<String>,
    },
    /// Another run holds the draft
    AlreadyPublishing {
        /// Draft id
        draft_id: String,
    },
    /// The draft was already fully published
    AlreadyPublished {
        /// Draft id
        draft_id: String,
        /// Platform id of the root post
        root_external_id: String,
        /// Original publication time
        published_at: Option<DateTime<Utc>>,
    },
    /// This run completed the thread
    Published {
        /// Draft id
        draft_id: String,
        /// Platform id of the root post
        root_external_id: String,
        /// Publication time
        published_at: DateTime<Utc>,
        /// Units sent during this run (resumed runs send fewer)
        posted_units: usize,
    },
}

impl PublishOutcome {
    /// Status the draft is in after this outcome.
    pub fn status(&self) -> DraftStatus {
        match self {
            PublishOutcome::DryRun { status, .. } => *status,
            PublishOutcome::AlreadyPublishing { .. } => DraftStatus::Publishing,
            PublishOutcome::AlreadyPublished { .. } | PublishOutcome::Published { .. } => {
                DraftStatus::Published
            }
        }
    }
}
