//! Thread drafts: one social thread per content record.

use crate::PostUnit;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Publication status of a thread draft.
///
/// `Ready | Failed -> Publishing -> Published`, with `Publishing -> Failed`
/// on any unrecoverable error.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::EnumIter,
    derive_more::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum DraftStatus {
    /// Segmented and waiting to be published
    #[display("ready")]
    Ready,
    /// A publish run holds the draft
    #[display("publishing")]
    Publishing,
    /// Every unit is on the platform
    #[display("published")]
    Published,
    /// The last publish run stopped on an error
    #[display("failed")]
    Failed,
}

impl DraftStatus {
    /// Convert to string representation for database storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            DraftStatus::Ready => "ready",
            DraftStatus::Publishing => "publishing",
            DraftStatus::Published => "published",
            DraftStatus::Failed => "failed",
        }
    }

    /// True for the statuses a publish run may start from.
    pub fn is_publishable(&self) -> bool {
        matches!(self, DraftStatus::Ready | DraftStatus::Failed)
    }
}

impl std::str::FromStr for DraftStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ready" => Ok(DraftStatus::Ready),
            "publishing" => Ok(DraftStatus::Publishing),
            "published" => Ok(DraftStatus::Published),
            "failed" => Ok(DraftStatus::Failed),
            _ => Err(format!("Unknown draft status: {}", s)),
        }
    }
}

/// How a content record is turned into posts.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::EnumIter,
    derive_more::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum PostingMode {
    /// Numbered multi-post thread: headline, highlights, call to action
    #[default]
    #[display("thread")]
    Thread,
    /// One post carrying headline, bullet highlights and link
    #[display("single")]
    Single,
}

impl PostingMode {
    /// Convert to string representation for database storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            PostingMode::Thread => "thread",
            PostingMode::Single => "single",
        }
    }
}

impl std::str::FromStr for PostingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "thread" => Ok(PostingMode::Thread),
            "single" => Ok(PostingMode::Single),
            _ => Err(format!("Unknown posting mode: {}", s)),
        }
    }
}

/// Deterministic draft id for a content record.
///
/// Regenerating a draft for the same record always lands on the same row.
pub fn draft_id_for(content_id: &str) -> String {
    format!("draft_{}", content_id)
}

/// A social thread tied to one content record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadDraft {
    /// `draft_<content_id>`
    pub id: String,
    /// Content record this thread announces
    pub content_id: String,
    /// Target platform
    pub platform: String,
    /// Call-to-action link embedded in the thread
    pub url: String,
    /// Segmentation mode the units were built with
    pub mode: PostingMode,
    /// Publication status
    pub status: DraftStatus,
    /// Number of owned post units
    pub unit_count: i32,
    /// Platform id of the first post
    pub root_external_id: Option<String>,
    /// Platform id of the most recent post
    pub last_external_id: Option<String>,
    /// Publish runs started so far
    pub attempts: i32,
    /// Message of the last failed run
    pub last_error: Option<String>,
    /// When the last unit went out
    pub published_at: Option<DateTime<Utc>>,
    /// Who generated the draft
    pub created_by: String,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last modification time
    pub updated_at: DateTime<Utc>,
}

/// Fields written when a draft is created or refreshed.
#[derive(Debug, Clone, PartialEq, Eq, derive_builder::Builder)]
#[builder(setter(into))]
pub struct NewThreadDraft {
    /// `draft_<content_id>`
    pub id: String,
    /// Content record this thread announces
    pub content_id: String,
    /// Target platform
    #[builder(default = "crate::PLATFORM_X.to_string()")]
    pub platform: String,
    /// Call-to-action link
    pub url: String,
    /// Segmentation mode
    #[builder(default)]
    pub mode: PostingMode,
    /// Number of units about to be inserted
    pub unit_count: i32,
    /// Who generated the draft (only written on create)
    pub created_by: String,
}

impl NewThreadDraft {
    /// Materialize a brand-new draft row.
    pub fn into_draft(self, now: DateTime<Utc>) -> ThreadDraft {
        ThreadDraft {
            id: self.id,
            content_id: self.content_id,
            platform: self.platform,
            url: self.url,
            mode: self.mode,
            status: DraftStatus::Ready,
            unit_count: self.unit_count,
            root_external_id: None,
            last_external_id: None,
            attempts: 0,
            last_error: None,
            published_at: None,
            created_by: self.created_by,
            created_at: now,
            updated_at: now,
        }
    }

    /// Refresh an existing draft in place.
    ///
    /// The draft returns to `Ready` and forgets the previous publication,
    /// since its units are about to be replaced. `attempts` and ownership
    /// metadata are kept.
    pub fn refresh(&self, draft: &mut ThreadDraft, now: DateTime<Utc>) {
        draft.content_id = self.content_id.clone();
        draft.url = self.url.clone();
        draft.mode = self.mode;
        draft.status = DraftStatus::Ready;
        draft.unit_count = self.unit_count;
        draft.root_external_id = None;
        draft.last_external_id = None;
        draft.last_error = None;
        draft.published_at = None;
        draft.updated_at = now;
    }
}

/// Partial update of a draft. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, derive_setters::Setters)]
#[setters(prefix = "with_", strip_option)]
pub struct DraftUpdate {
    /// New status
    pub status: Option<DraftStatus>,
    /// New root post id
    pub root_external_id: Option<String>,
    /// New most-recent post id
    pub last_external_id: Option<String>,
    /// `Some(None)` clears the error, `Some(Some(_))` records one
    pub last_error: Option<Option<String>>,
    /// Publication time
    pub published_at: Option<DateTime<Utc>>,
    /// Bump `attempts` by one
    pub increment_attempts: bool,
}

impl DraftUpdate {
    /// Apply this update to an in-memory draft.
    pub fn apply_to(&self, draft: &mut ThreadDraft, now: DateTime<Utc>) {
        if let Some(status) = self.status {
            draft.status = status;
        }
        if let Some(root) = &self.root_external_id {
            draft.root_external_id = Some(root.clone());
        }
        if let Some(last) = &self.last_external_id {
            draft.last_external_id = Some(last.clone());
        }
        if let Some(last_error) = &self.last_error {
            draft.last_error = last_error.clone();
        }
        if let Some(published_at) = self.published_at {
            draft.published_at = Some(published_at);
        }
        if self.increment_attempts {
            draft.attempts += 1;
        }
        draft.updated_at = now;
    }
}

/// A draft together with its units in posting order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadWithUnits {
    /// The draft row
    pub draft: ThreadDraft,
    /// Units ordered by `order` ascending
    pub units: Vec<PostUnit>,
}

impl ThreadWithUnits {
    /// True when the root is known and every unit carries a platform id.
    pub fn is_fully_posted(&self) -> bool {
        self.draft.root_external_id.is_some()
            && !self.units.is_empty()
            && self.units.iter().all(|unit| unit.external_id.is_some())
    }
}

/// Result of creating or refreshing a draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftSummary {
    /// Draft id
    pub draft_id: String,
    /// Always `Ready` after a refresh
    pub status: DraftStatus,
    /// Number of units generated
    pub unit_count: usize,
    /// Mode the units were built with
    pub mode: PostingMode,
    /// Call-to-action link used
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn status_strings_parse_back() {
        for status in DraftStatus::iter() {
            assert_eq!(status.as_str().parse::<DraftStatus>(), Ok(status));
            assert_eq!(status.to_string(), status.as_str());
        }
        assert!("posting".parse::<DraftStatus>().is_err());
    }

    #[test]
    fn mode_strings_parse_back() {
        for mode in PostingMode::iter() {
            assert_eq!(mode.as_str().parse::<PostingMode>(), Ok(mode));
        }
        assert_eq!("SINGLE".parse::<PostingMode>(), Ok(PostingMode::Single));
    }

    #[test]
    fn only_ready_and_failed_are_publishable() {
        let publishable: Vec<_> = DraftStatus::iter().filter(|s| s.is_publishable()).collect();
        assert_eq!(publishable, vec![DraftStatus::Ready, DraftStatus::Failed]);
    }

    #[test]
    fn refresh_resets_publication_but_keeps_attempts() {
        let now = Utc::now();
        let new = NewThreadDraftBuilder::default()
            .id(draft_id_for("issue_1"))
            .content_id("issue_1")
            .url("https://site/posts/a")
            .unit_count(3)
            .created_by("editor")
            .build()
            .expect("valid draft");
        let mut draft = new.clone().into_draft(now);
        draft.status = DraftStatus::Failed;
        draft.attempts = 2;
        draft.root_external_id = Some("100".into());
        draft.last_error = Some("boom".into());

        new.refresh(&mut draft, now);

        assert_eq!(draft.id, "draft_issue_1");
        assert_eq!(draft.status, DraftStatus::Ready);
        assert_eq!(draft.attempts, 2);
        assert!(draft.root_external_id.is_none());
        assert!(draft.last_error.is_none());
        assert_eq!(draft.platform, "X");
    }

    #[test]
    fn update_clears_error_and_counts_attempts() {
        let now = Utc::now();
        let mut draft = NewThreadDraftBuilder::default()
            .id("draft_1")
            .content_id("1")
            .url("u")
            .unit_count(1)
            .created_by("editor")
            .build()
            .expect("valid draft")
            .into_draft(now);
        draft.last_error = Some("old".into());

        DraftUpdate::default()
            .with_status(DraftStatus::Publishing)
            .with_last_error(None)
            .with_increment_attempts(true)
            .apply_to(&mut draft, now);

        assert_eq!(draft.status, DraftStatus::Publishing);
        assert_eq!(draft.attempts, 1);
        assert!(draft.last_error.is_none());
    }
}
