//! PostgreSQL repository for drafts, units and issues.

use crate::models::{
    DraftChangeset, IssueRow, NewPostUnitRow, NewThreadDraftRow, PostUnitRow, ThreadDraftRow,
};
use crate::schema::{issues, post_units, thread_drafts};
use async_trait::async_trait;
use chrono::Utc;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use herald_core::{
    ContentRecord, DraftStatus, DraftUpdate, NewPostUnit, NewThreadDraft, PostUnit,
    PostUnitUpdate, ThreadDraft,
};
use herald_error::{DatabaseError, HeraldResult, NotFoundError};
use herald_interface::{ContentStore, DraftStore, PostUnitStore};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, instrument};

/// PostgreSQL repository implementing every Herald store.
///
/// # Example
/// ```no_run
/// use herald_database::{PostgresThreadRepository, establish_connection};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let conn = establish_connection()?;
///     let repo = PostgresThreadRepository::new(conn);
///     // Hand `repo` to a DraftManager or PublishOrchestrator
///     Ok(())
/// }
/// ```
pub struct PostgresThreadRepository {
    /// Database connection wrapped in Arc<Mutex> for async safety.
    conn: Arc<Mutex<PgConnection>>,
}

impl PostgresThreadRepository {
    /// Create a new repository.
    pub fn new(conn: PgConnection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Create a repository from a shared connection.
    pub fn from_arc(conn: Arc<Mutex<PgConnection>>) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl ContentStore for PostgresThreadRepository {
    #[instrument(skip(self))]
    async fn find_content(&self, id: &str) -> HeraldResult<Option<ContentRecord>> {
        let mut conn = self.conn.lock().await;

        let row: Option<IssueRow> = issues::table
            .find(id)
            .select(IssueRow::as_select())
            .first(&mut *conn)
            .optional()
            .map_err(DatabaseError::from)?;

        Ok(row.map(ContentRecord::try_from).transpose()?)
    }
}

#[async_trait]
impl DraftStore for PostgresThreadRepository {
    /// Uses INSERT ... ON CONFLICT so a refresh keeps `attempts`,
    /// `platform`, `created_by` and `created_at`.
    #[instrument(skip(self, draft), fields(draft_id = %draft.id))]
    async fn upsert_draft(&self, draft: NewThreadDraft) -> HeraldResult<ThreadDraft> {
        let mut conn = self.conn.lock().await;
        let row = NewThreadDraftRow::from(draft);

        let stored: ThreadDraftRow = diesel::insert_into(thread_drafts::table)
            .values(&row)
            .on_conflict(thread_drafts::id)
            .do_update()
            .set((
                thread_drafts::content_id.eq(&row.content_id),
                thread_drafts::url.eq(&row.url),
                thread_drafts::mode.eq(&row.mode),
                thread_drafts::status.eq(DraftStatus::Ready.as_str()),
                thread_drafts::unit_count.eq(row.unit_count),
                thread_drafts::root_external_id.eq(None::<String>),
                thread_drafts::last_external_id.eq(None::<String>),
                thread_drafts::last_error.eq(None::<String>),
                thread_drafts::published_at.eq(None::<chrono::DateTime<Utc>>),
                thread_drafts::updated_at.eq(diesel::dsl::now),
            ))
            .returning(ThreadDraftRow::as_returning())
            .get_result(&mut *conn)
            .map_err(DatabaseError::from)?;

        Ok(ThreadDraft::try_from(stored)?)
    }

    #[instrument(skip(self))]
    async fn find_draft(&self, id: &str) -> HeraldResult<Option<ThreadDraft>> {
        let mut conn = self.conn.lock().await;

        let row: Option<ThreadDraftRow> = thread_drafts::table
            .find(id)
            .select(ThreadDraftRow::as_select())
            .first(&mut *conn)
            .optional()
            .map_err(DatabaseError::from)?;

        Ok(row.map(ThreadDraft::try_from).transpose()?)
    }

    #[instrument(skip(self, update))]
    async fn update_draft(&self, id: &str, update: DraftUpdate) -> HeraldResult<ThreadDraft> {
        let mut conn = self.conn.lock().await;
        let changeset = DraftChangeset::from_update(&update, Utc::now());

        let row = conn
            .transaction::<Option<ThreadDraftRow>, diesel::result::Error, _>(|conn| {
                let row = diesel::update(thread_drafts::table.find(id))
                    .set(&changeset)
                    .returning(ThreadDraftRow::as_returning())
                    .get_result(conn)
                    .optional()?;
                if row.is_none() || !update.increment_attempts {
                    return Ok(row);
                }
                diesel::update(thread_drafts::table.find(id))
                    .set(thread_drafts::attempts.eq(thread_drafts::attempts + 1))
                    .returning(ThreadDraftRow::as_returning())
                    .get_result(conn)
                    .optional()
            })
            .map_err(DatabaseError::from)?
            .ok_or_else(|| NotFoundError::new("thread draft", id))?;

        Ok(ThreadDraft::try_from(row)?)
    }
}

#[async_trait]
impl PostUnitStore for PostgresThreadRepository {
    #[instrument(skip(self))]
    async fn delete_units_for_thread(&self, thread_id: &str) -> HeraldResult<usize> {
        let mut conn = self.conn.lock().await;

        let deleted =
            diesel::delete(post_units::table.filter(post_units::thread_id.eq(thread_id)))
                .execute(&mut *conn)
                .map_err(DatabaseError::from)?;
        debug!(deleted, "Deleted post units");
        Ok(deleted)
    }

    #[instrument(skip(self, units), fields(count = units.len()))]
    async fn create_units(&self, units: Vec<NewPostUnit>) -> HeraldResult<usize> {
        if units.is_empty() {
            return Ok(0);
        }
        let mut conn = self.conn.lock().await;
        let rows: Vec<NewPostUnitRow> = units.into_iter().map(NewPostUnitRow::from).collect();

        let created = diesel::insert_into(post_units::table)
            .values(&rows)
            .execute(&mut *conn)
            .map_err(DatabaseError::from)?;
        Ok(created)
    }

    #[instrument(skip(self))]
    async fn list_units(&self, thread_id: &str) -> HeraldResult<Vec<PostUnit>> {
        let mut conn = self.conn.lock().await;

        let rows: Vec<PostUnitRow> = post_units::table
            .filter(post_units::thread_id.eq(thread_id))
            .order(post_units::unit_order.asc())
            .select(PostUnitRow::as_select())
            .load(&mut *conn)
            .map_err(DatabaseError::from)?;

        Ok(rows.into_iter().map(PostUnit::from).collect())
    }

    #[instrument(skip(self, update))]
    async fn update_unit(&self, id: i64, update: PostUnitUpdate) -> HeraldResult<PostUnit> {
        let mut conn = self.conn.lock().await;
        let target = post_units::table.find(id);

        let row: Option<PostUnitRow> = match update.external_id {
            Some(external_id) => diesel::update(target)
                .set((
                    post_units::external_id.eq(external_id),
                    post_units::updated_at.eq(diesel::dsl::now),
                ))
                .returning(PostUnitRow::as_returning())
                .get_result(&mut *conn),
            None => diesel::update(target)
                .set(post_units::updated_at.eq(diesel::dsl::now))
                .returning(PostUnitRow::as_returning())
                .get_result(&mut *conn),
        }
        .optional()
        .map_err(DatabaseError::from)?;

        row.map(PostUnit::from)
            .ok_or_else(|| NotFoundError::new("post unit", id.to_string()).into())
    }
}
