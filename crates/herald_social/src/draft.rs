//! Idempotent draft generation.

use crate::{DraftLocks, ThreadSegmenter};
use herald_core::{
    ContentRecord, DraftStatus, DraftSummary, HeraldConfig, NewPostUnit, NewThreadDraftBuilder,
    PLATFORM_X, PostingMode, ThreadWithUnits, draft_id_for,
};
use herald_error::{ConfigError, HeraldResult, InvalidStateError, NotFoundError};
use herald_interface::ThreadStore;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Creates and refreshes thread drafts from content records.
///
/// Each content record owns at most one draft, `draft_<content_id>`.
/// Regenerating replaces its units wholesale and returns it to `Ready`.
///
/// Share one [`DraftLocks`] with the [`PublishOrchestrator`](crate::PublishOrchestrator)
/// so a refresh never rewrites a draft while it is being posted.
pub struct DraftManager<S> {
    store: Arc<S>,
    locks: DraftLocks,
    segmenter: ThreadSegmenter,
    public_site_url: Option<String>,
    default_mode: PostingMode,
    created_by: String,
}

impl<S: ThreadStore> DraftManager<S> {
    /// Create a draft manager over a store.
    pub fn new(store: Arc<S>, config: &HeraldConfig) -> Self {
        Self {
            store,
            locks: DraftLocks::new(),
            segmenter: ThreadSegmenter::new(config.thread.clone()),
            public_site_url: config.site.public_site_url.clone(),
            default_mode: config.thread.default_mode,
            created_by: config.publish.created_by.clone(),
        }
    }

    /// Share a lock table with the publish orchestrator.
    pub fn with_locks(mut self, locks: DraftLocks) -> Self {
        self.locks = locks;
        self
    }

    /// The segmenter drafts are built with.
    pub fn segmenter(&self) -> &ThreadSegmenter {
        &self.segmenter
    }

    /// Call-to-action link for a record.
    ///
    /// An explicit link wins; otherwise `<public_site_url>/posts/<slug>`.
    ///
    /// # Errors
    ///
    /// `ConfigError` when there is neither an explicit link nor a site URL.
    pub fn resolve_cta_url(
        &self,
        record: &ContentRecord,
        explicit: Option<&str>,
    ) -> HeraldResult<String> {
        if let Some(url) = explicit.map(str::trim).filter(|url| !url.is_empty()) {
            return Ok(url.to_string());
        }
        match &self.public_site_url {
            Some(base) => Ok(format!(
                "{}/posts/{}",
                base.trim_end_matches('/'),
                record.slug()
            )),
            None => Err(ConfigError::new(
                "No CTA URL given and site.public_site_url is not configured",
            )
            .into()),
        }
    }

    /// Segment a content record and persist it as a `Ready` draft.
    ///
    /// Repeated calls for an unchanged record produce identical units.
    ///
    /// # Errors
    ///
    /// - `NotFoundError` when the content record does not exist
    /// - `ConfigError` when no CTA link can be built
    /// - `EmptyThreadError` when the record has nothing to post
    /// - `InvalidStateError` while the draft is being published
    #[instrument(skip(self, cta_url), fields(draft_id = %draft_id_for(content_id)))]
    pub async fn create_or_refresh_draft(
        &self,
        content_id: &str,
        cta_url: Option<&str>,
        mode: Option<PostingMode>,
    ) -> HeraldResult<DraftSummary> {
        self.refresh(content_id, cta_url, mode, false).await
    }

    /// Like [`create_or_refresh_draft`](Self::create_or_refresh_draft), but
    /// also rewrites a draft whose stored status is `Publishing`.
    ///
    /// Recovers a draft left `Publishing` by a run that died. A run still
    /// holding the lock in this process is never overridden.
    ///
    /// # Errors
    ///
    /// As [`create_or_refresh_draft`](Self::create_or_refresh_draft).
    #[instrument(skip(self, cta_url), fields(draft_id = %draft_id_for(content_id)))]
    pub async fn force_refresh_draft(
        &self,
        content_id: &str,
        cta_url: Option<&str>,
        mode: Option<PostingMode>,
    ) -> HeraldResult<DraftSummary> {
        self.refresh(content_id, cta_url, mode, true).await
    }

    async fn refresh(
        &self,
        content_id: &str,
        cta_url: Option<&str>,
        mode: Option<PostingMode>,
        override_publishing: bool,
    ) -> HeraldResult<DraftSummary> {
        let record = self
            .store
            .find_content(content_id)
            .await?
            .ok_or_else(|| NotFoundError::new("content record", content_id))?;

        let url = self.resolve_cta_url(&record, cta_url)?;
        let mode = mode.unwrap_or(self.default_mode);
        let texts = self.segmenter.segment(mode, &record, &url)?;
        debug!(%url, %mode, units = texts.len(), "Built thread units");

        let draft_id = draft_id_for(content_id);
        let unit_count = i32::try_from(texts.len())
            .map_err(|_| ConfigError::new(format!("Too many units: {}", texts.len())))?;

        // Held until the units are replaced so no publish run starts in between
        let Some(_guard) = self.locks.try_acquire(&draft_id).await else {
            warn!("Refresh rejected, draft is being published");
            return Err(
                InvalidStateError::new(&draft_id, DraftStatus::Publishing.as_str()).into(),
            );
        };

        if !override_publishing {
            let stored = self.store.find_draft(&draft_id).await?;
            if stored.is_some_and(|draft| draft.status == DraftStatus::Publishing) {
                warn!("Refresh rejected, stored status is publishing");
                return Err(
                    InvalidStateError::new(&draft_id, DraftStatus::Publishing.as_str()).into(),
                );
            }
        }

        let draft = NewThreadDraftBuilder::default()
            .id(draft_id.clone())
            .content_id(content_id)
            .platform(PLATFORM_X)
            .url(url.clone())
            .mode(mode)
            .unit_count(unit_count)
            .created_by(self.created_by.clone())
            .build()
            .map_err(|e| ConfigError::new(format!("Invalid draft: {}", e)))?;

        let draft = self.store.upsert_draft(draft).await?;
        let removed = self.store.delete_units_for_thread(&draft.id).await?;
        let created = self
            .store
            .create_units(NewPostUnit::sequence(&draft.id, &texts)?)
            .await?;

        info!(removed, created, "Draft ready");

        Ok(DraftSummary {
            draft_id,
            status: draft.status,
            unit_count: texts.len(),
            mode,
            url,
        })
    }

    /// A draft with its units in posting order.
    ///
    /// # Errors
    ///
    /// `NotFoundError` when the draft does not exist.
    #[instrument(skip(self))]
    pub async fn get_draft(&self, draft_id: &str) -> HeraldResult<ThreadWithUnits> {
        let draft = self
            .store
            .find_draft(draft_id)
            .await?
            .ok_or_else(|| NotFoundError::new("thread draft", draft_id))?;
        let units = self.store.list_units(draft_id).await?;
        Ok(ThreadWithUnits { draft, units })
    }
}
