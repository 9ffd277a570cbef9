//! Persistence traits for content records, drafts and post units.

use async_trait::async_trait;
use herald_core::{
    ContentRecord, DraftUpdate, NewPostUnit, NewThreadDraft, PostUnit, PostUnitUpdate,
    ThreadDraft,
};
use herald_error::HeraldResult;

/// Read-only access to newsletter content records.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Look up a content record by id.
    async fn find_content(&self, id: &str) -> HeraldResult<Option<ContentRecord>>;
}

/// Storage for thread drafts.
#[async_trait]
pub trait DraftStore: Send + Sync {
    /// Create the draft, or refresh the existing row with the same id.
    ///
    /// A refresh sets the status back to `Ready` and keeps `attempts`,
    /// `platform`, `created_by` and `created_at`.
    async fn upsert_draft(&self, draft: NewThreadDraft) -> HeraldResult<ThreadDraft>;

    /// Look up a draft by id.
    async fn find_draft(&self, id: &str) -> HeraldResult<Option<ThreadDraft>>;

    /// Apply a partial update.
    ///
    /// # Errors
    ///
    /// `NotFoundError` when the draft does not exist.
    async fn update_draft(&self, id: &str, update: DraftUpdate) -> HeraldResult<ThreadDraft>;
}

/// Storage for the posts of a thread.
#[async_trait]
pub trait PostUnitStore: Send + Sync {
    /// Remove every unit owned by a thread, returning how many were deleted.
    async fn delete_units_for_thread(&self, thread_id: &str) -> HeraldResult<usize>;

    /// Insert units, returning how many were created.
    async fn create_units(&self, units: Vec<NewPostUnit>) -> HeraldResult<usize>;

    /// Units of a thread ordered by `order` ascending.
    async fn list_units(&self, thread_id: &str) -> HeraldResult<Vec<PostUnit>>;

    /// Apply a partial update.
    ///
    /// # Errors
    ///
    /// `NotFoundError` when the unit does not exist.
    async fn update_unit(&self, id: i64, update: PostUnitUpdate) -> HeraldResult<PostUnit>;
}

/// Everything the publishing pipeline persists.
///
/// Blanket-implemented for any type providing all three stores.
pub trait ThreadStore: ContentStore + DraftStore + PostUnitStore {}

impl<T> ThreadStore for T where T: ContentStore + DraftStore + PostUnitStore {}
