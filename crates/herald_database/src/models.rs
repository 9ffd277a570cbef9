//! Diesel row types and their conversions to core records.

use crate::schema::{issues, post_units, thread_drafts};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use herald_core::{
    ContentRecord, ContentRecordBuilder, ContentStatus, DraftStatus, DraftUpdate, NewPostUnit,
    NewThreadDraft, PostUnit, PostingMode, ThreadDraft,
};
use herald_error::{DatabaseError, DatabaseErrorKind};

fn invalid_column(column: &str, err: impl std::fmt::Display) -> DatabaseError {
    DatabaseError::new(DatabaseErrorKind::Serialization(format!(
        "Invalid {}: {}",
        column, err
    )))
}

/// Database row for the `issues` table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = issues)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct IssueRow {
    /// Issue id
    pub id: String,
    /// URL slug
    pub slug: String,
    /// Headline
    pub title: String,
    /// Email subject
    pub subject: String,
    /// Inbox preview text
    pub preview_text: Option<String>,
    /// Opening paragraph
    pub intro: Option<String>,
    /// "What's going on" narrative
    pub whats_going_on: Option<String>,
    /// "Why it matters" narrative
    pub why_it_matters: Option<String>,
    /// Further reading
    pub read_more: Option<String>,
    /// Editorial category
    pub category: Option<String>,
    /// `draft`, `published` or `archived`
    pub status: String,
    /// Publication time on the site
    pub published_at: Option<DateTime<Utc>>,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last modification time
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<IssueRow> for ContentRecord {
    type Error = DatabaseError;

    fn try_from(row: IssueRow) -> Result<Self, Self::Error> {
        let status: ContentStatus = row
            .status
            .parse()
            .map_err(|e| invalid_column("issues.status", e))?;

        let mut builder = ContentRecordBuilder::default();
        builder
            .id(row.id)
            .slug(row.slug)
            .title(row.title)
            .subject(row.subject)
            .status(status)
            .created_at(row.created_at)
            .updated_at(row.updated_at);
        if let Some(preview_text) = row.preview_text {
            builder.preview_text(preview_text);
        }
        if let Some(intro) = row.intro {
            builder.intro(intro);
        }
        if let Some(whats_going_on) = row.whats_going_on {
            builder.whats_going_on(whats_going_on);
        }
        if let Some(why_it_matters) = row.why_it_matters {
            builder.why_it_matters(why_it_matters);
        }
        if let Some(read_more) = row.read_more {
            builder.read_more(read_more);
        }
        if let Some(category) = row.category {
            builder.category(category);
        }
        if let Some(published_at) = row.published_at {
            builder.published_at(published_at);
        }

        builder.build().map_err(|e| invalid_column("issues row", e))
    }
}

/// Database row for the `thread_drafts` table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = thread_drafts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ThreadDraftRow {
    /// `draft_<content_id>`
    pub id: String,
    /// Issue the thread announces
    pub content_id: String,
    /// Target platform
    pub platform: String,
    /// Call-to-action link
    pub url: String,
    /// `thread` or `single`
    pub mode: String,
    /// `ready`, `publishing`, `published` or `failed`
    pub status: String,
    /// Number of owned units
    pub unit_count: i32,
    /// Platform id of the first post
    pub root_external_id: Option<String>,
    /// Platform id of the latest post
    pub last_external_id: Option<String>,
    /// Publish runs started
    pub attempts: i32,
    /// Message of the last failure
    pub last_error: Option<String>,
    /// Completion time
    pub published_at: Option<DateTime<Utc>>,
    /// Who generated the draft
    pub created_by: String,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last modification time
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<ThreadDraftRow> for ThreadDraft {
    type Error = DatabaseError;

    fn try_from(row: ThreadDraftRow) -> Result<Self, Self::Error> {
        let status: DraftStatus = row
            .status
            .parse()
            .map_err(|e| invalid_column("thread_drafts.status", e))?;
        let mode: PostingMode = row
            .mode
            .parse()
            .map_err(|e| invalid_column("thread_drafts.mode", e))?;

        Ok(ThreadDraft {
            id: row.id,
            content_id: row.content_id,
            platform: row.platform,
            url: row.url,
            mode,
            status,
            unit_count: row.unit_count,
            root_external_id: row.root_external_id,
            last_external_id: row.last_external_id,
            attempts: row.attempts,
            last_error: row.last_error,
            published_at: row.published_at,
            created_by: row.created_by,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Insertable struct for the `thread_drafts` table.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = thread_drafts)]
pub struct NewThreadDraftRow {
    /// `draft_<content_id>`
    pub id: String,
    /// Issue the thread announces
    pub content_id: String,
    /// Target platform
    pub platform: String,
    /// Call-to-action link
    pub url: String,
    /// `thread` or `single`
    pub mode: String,
    /// Always `ready` on insert
    pub status: String,
    /// Number of units
    pub unit_count: i32,
    /// Always 0 on insert
    pub attempts: i32,
    /// Who generated the draft
    pub created_by: String,
}

impl From<NewThreadDraft> for NewThreadDraftRow {
    fn from(draft: NewThreadDraft) -> Self {
        Self {
            id: draft.id,
            content_id: draft.content_id,
            platform: draft.platform,
            url: draft.url,
            mode: draft.mode.as_str().to_string(),
            status: DraftStatus::Ready.as_str().to_string(),
            unit_count: draft.unit_count,
            attempts: 0,
            created_by: draft.created_by,
        }
    }
}

/// Partial update of a `thread_drafts` row. `None` columns are left as is.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = thread_drafts)]
pub struct DraftChangeset {
    /// New status
    pub status: Option<String>,
    /// New root id
    pub root_external_id: Option<String>,
    /// New latest id
    pub last_external_id: Option<String>,
    /// `Some(None)` writes NULL
    pub last_error: Option<Option<String>>,
    /// Completion time
    pub published_at: Option<DateTime<Utc>>,
    /// Always written
    pub updated_at: DateTime<Utc>,
}

impl DraftChangeset {
    /// Column changes for a core draft update, stamped with `now`.
    ///
    /// `increment_attempts` is applied as a separate SQL expression.
    pub fn from_update(update: &DraftUpdate, now: DateTime<Utc>) -> Self {
        Self {
            status: update.status.map(|status| status.as_str().to_string()),
            root_external_id: update.root_external_id.clone(),
            last_external_id: update.last_external_id.clone(),
            last_error: update.last_error.clone(),
            published_at: update.published_at,
            updated_at: now,
        }
    }
}

/// Database row for the `post_units` table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = post_units)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PostUnitRow {
    /// Row id
    pub id: i64,
    /// Owning draft
    pub thread_id: String,
    /// 1-based posting position
    pub unit_order: i32,
    /// Post body
    pub text: String,
    /// Platform id once posted
    pub external_id: Option<String>,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last modification time
    pub updated_at: DateTime<Utc>,
}

impl From<PostUnitRow> for PostUnit {
    fn from(row: PostUnitRow) -> Self {
        Self {
            id: row.id,
            thread_id: row.thread_id,
            order: row.unit_order,
            text: row.text,
            external_id: row.external_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Insertable struct for the `post_units` table.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = post_units)]
pub struct NewPostUnitRow {
    /// Owning draft
    pub thread_id: String,
    /// 1-based posting position
    pub unit_order: i32,
    /// Post body
    pub text: String,
}

impl From<NewPostUnit> for NewPostUnitRow {
    fn from(unit: NewPostUnit) -> Self {
        Self {
            thread_id: unit.thread_id,
            unit_order: unit.order,
            text: unit.text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft_row(status: &str, mode: &str) -> ThreadDraftRow {
        let now = Utc::now();
        ThreadDraftRow {
            id: "draft_1".into(),
            content_id: "1".into(),
            platform: "X".into(),
            url: "https://site/posts/a".into(),
            mode: mode.into(),
            status: status.into(),
            unit_count: 3,
            root_external_id: None,
            last_external_id: None,
            attempts: 0,
            last_error: None,
            published_at: None,
            created_by: "herald".into(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn draft_row_round_trips_enums() {
        let draft = ThreadDraft::try_from(draft_row("failed", "single")).expect("valid row");
        assert_eq!(draft.status, DraftStatus::Failed);
        assert_eq!(draft.mode, PostingMode::Single);
    }

    #[test]
    fn unknown_status_is_serialization_error() {
        let err = ThreadDraft::try_from(draft_row("posting", "thread")).expect_err("bad status");
        assert!(matches!(err.kind, DatabaseErrorKind::Serialization(_)));
    }

    #[test]
    fn issue_row_keeps_optional_fields() {
        let now = Utc::now();
        let row = IssueRow {
            id: "issue_1".into(),
            slug: "rates".into(),
            title: "X raises rates".into(),
            subject: "Rates".into(),
            preview_text: None,
            intro: Some("Intro".into()),
            whats_going_on: None,
            why_it_matters: Some("Because".into()),
            read_more: None,
            category: None,
            status: "published".into(),
            published_at: Some(now),
            created_at: now,
            updated_at: now,
        };

        let record = ContentRecord::try_from(row).expect("valid row");
        assert_eq!(record.intro().as_deref(), Some("Intro"));
        assert!(record.whats_going_on().is_none());
        assert_eq!(*record.status(), ContentStatus::Published);
        assert_eq!(*record.published_at(), Some(now));
    }

    #[test]
    fn changeset_clears_error_explicitly() {
        let update = DraftUpdate::default()
            .with_status(DraftStatus::Publishing)
            .with_last_error(None);
        let changeset = DraftChangeset::from_update(&update, Utc::now());
        assert_eq!(changeset.status.as_deref(), Some("publishing"));
        assert_eq!(changeset.last_error, Some(None));
        assert!(changeset.root_external_id.is_none());
    }
}
