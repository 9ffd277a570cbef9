//! HashMap-backed store.

use async_trait::async_trait;
use chrono::Utc;
use herald_core::{
    ContentRecord, DraftUpdate, NewPostUnit, NewThreadDraft, PostUnit, PostUnitUpdate,
    ThreadDraft,
};
use herald_error::{HeraldResult, NotFoundError};
use herald_interface::{ContentStore, DraftStore, PostUnitStore};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

/// In-memory store for content records, drafts and post units.
///
/// Clones share the same data. All data is lost when the last clone is
/// dropped.
///
/// # Example
/// ```no_run
/// use herald_storage::InMemoryStore;
/// use herald_interface::DraftStore;
///
/// #[tokio::main]
/// async fn main() {
///     let store = InMemoryStore::new();
///     assert!(store.find_draft("draft_1").await.unwrap().is_none());
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    state: Arc<RwLock<State>>,
}

#[derive(Debug, Default)]
struct State {
    contents: HashMap<String, ContentRecord>,
    drafts: HashMap<String, ThreadDraft>,
    units: BTreeMap<i64, PostUnit>,
    next_unit_id: i64,
}

impl InMemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with content records.
    pub async fn with_contents(records: impl IntoIterator<Item = ContentRecord>) -> Self {
        let store = Self::new();
        for record in records {
            store.insert_content(record).await;
        }
        store
    }

    /// Add or replace a content record.
    pub async fn insert_content(&self, record: ContentRecord) {
        self.state
            .write()
            .await
            .contents
            .insert(record.id().clone(), record);
    }

    /// Total number of stored units across all threads (for testing).
    pub async fn unit_count(&self) -> usize {
        self.state.read().await.units.len()
    }
}

#[async_trait]
impl ContentStore for InMemoryStore {
    async fn find_content(&self, id: &str) -> HeraldResult<Option<ContentRecord>> {
        Ok(self.state.read().await.contents.get(id).cloned())
    }
}

#[async_trait]
impl DraftStore for InMemoryStore {
    #[instrument(skip(self, draft), fields(draft_id = %draft.id))]
    async fn upsert_draft(&self, draft: NewThreadDraft) -> HeraldResult<ThreadDraft> {
        let now = Utc::now();
        let mut state = self.state.write().await;
        let stored = match state.drafts.get_mut(&draft.id) {
            Some(existing) => {
                debug!("Refreshing existing draft");
                draft.refresh(existing, now);
                existing.clone()
            }
            None => {
                debug!("Creating draft");
                let created = draft.into_draft(now);
                state.drafts.insert(created.id.clone(), created.clone());
                created
            }
        };
        Ok(stored)
    }

    async fn find_draft(&self, id: &str) -> HeraldResult<Option<ThreadDraft>> {
        Ok(self.state.read().await.drafts.get(id).cloned())
    }

    async fn update_draft(&self, id: &str, update: DraftUpdate) -> HeraldResult<ThreadDraft> {
        let mut state = self.state.write().await;
        let draft = state
            .drafts
            .get_mut(id)
            .ok_or_else(|| NotFoundError::new("thread draft", id))?;
        update.apply_to(draft, Utc::now());
        Ok(draft.clone())
    }
}

#[async_trait]
impl PostUnitStore for InMemoryStore {
    async fn delete_units_for_thread(&self, thread_id: &str) -> HeraldResult<usize> {
        let mut state = self.state.write().await;
        let before = state.units.len();
        state.units.retain(|_, unit| unit.thread_id != thread_id);
        Ok(before - state.units.len())
    }

    async fn create_units(&self, units: Vec<NewPostUnit>) -> HeraldResult<usize> {
        let now = Utc::now();
        let mut state = self.state.write().await;
        let count = units.len();
        for unit in units {
            state.next_unit_id += 1;
            let id = state.next_unit_id;
            state.units.insert(
                id,
                PostUnit {
                    id,
                    thread_id: unit.thread_id,
                    order: unit.order,
                    text: unit.text,
                    external_id: None,
                    created_at: now,
                    updated_at: now,
                },
            );
        }
        Ok(count)
    }

    async fn list_units(&self, thread_id: &str) -> HeraldResult<Vec<PostUnit>> {
        let state = self.state.read().await;
        let mut units: Vec<PostUnit> = state
            .units
            .values()
            .filter(|unit| unit.thread_id == thread_id)
            .cloned()
            .collect();
        units.sort_by_key(|unit| unit.order);
        Ok(units)
    }

    async fn update_unit(&self, id: i64, update: PostUnitUpdate) -> HeraldResult<PostUnit> {
        let mut state = self.state.write().await;
        let unit = state
            .units
            .get_mut(&id)
            .ok_or_else(|| NotFoundError::new("post unit", id.to_string()))?;
        if let Some(external_id) = update.external_id {
            unit.external_id = Some(external_id);
        }
        unit.updated_at = Utc::now();
        Ok(unit.clone())
    }
}
