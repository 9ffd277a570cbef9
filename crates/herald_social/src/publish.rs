//! Resumable thread publishing.

use crate::DraftLocks;
use chrono::Utc;
use herald_core::{
    DraftStatus, DraftUpdate, ImageSource, MediaRef, PostUnit, PostUnitUpdate, PostingMode,
    PublishConfig, PublishOutcome, ThreadDraft,
};
use herald_error::{EmptyThreadError, HeraldResult, InvalidStateError, NotFoundError};
use herald_interface::{PostingClient, ThreadStore};
use herald_rate_limit::{BackoffController, BackoffPolicy};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

/// Publishes thread drafts to a posting platform.
///
/// Units go out strictly in order, each reply chained to the previous post.
/// Every platform id is persisted as soon as it is known, so a run that
/// stops part-way resumes from the first unposted unit without duplicating
/// anything.
///
/// # Example
///
/// ```no_run
/// use herald_core::HeraldConfig;
/// use herald_social::{PublishOrchestrator, XClient};
/// use herald_storage::InMemoryStore;
/// use std::sync::Arc;
///
/// # async fn run() -> herald_error::HeraldResult<()> {
/// let config = HeraldConfig::load()?;
/// let store = Arc::new(InMemoryStore::new());
/// let client = Arc::new(XClient::from_config(&config.x)?);
/// let orchestrator = PublishOrchestrator::new(store, client, &config.publish);
///
/// let outcome = orchestrator.publish("draft_issue_1", false, None).await?;
/// println!("{:?}", outcome.status());
/// # Ok(())
/// # }
/// ```
pub struct PublishOrchestrator<S, C> {
    store: Arc<S>,
    client: Arc<C>,
    backoff: BackoffController,
    inter_post_delay: Duration,
    locks: DraftLocks,
}

impl<S: ThreadStore, C: PostingClient> PublishOrchestrator<S, C> {
    /// Create an orchestrator from the `[publish]` configuration section.
    pub fn new(store: Arc<S>, client: Arc<C>, config: &PublishConfig) -> Self {
        Self {
            store,
            client,
            backoff: BackoffController::new(BackoffPolicy::from_config(config)),
            inter_post_delay: config.inter_post_delay(),
            locks: DraftLocks::new(),
        }
    }

    /// Replace the retry policy.
    pub fn with_backoff(mut self, backoff: BackoffController) -> Self {
        self.backoff = backoff;
        self
    }

    /// Replace the spacing between replies.
    pub fn with_inter_post_delay(mut self, delay: Duration) -> Self {
        self.inter_post_delay = delay;
        self
    }

    /// Share a lock table with other orchestrators in this process.
    pub fn with_locks(mut self, locks: DraftLocks) -> Self {
        self.locks = locks;
        self
    }

    /// Publish a draft, or resume an interrupted publication.
    ///
    /// With `dry_run` the draft's status and unit texts are returned and
    /// nothing is sent or written. A draft that is being published or is
    /// already published is left untouched.
    ///
    /// # Errors
    ///
    /// - `NotFoundError` when the draft does not exist
    /// - `InvalidStateError` when the draft is not `Ready` or `Failed`
    /// - `EmptyThreadError` when the draft has no units
    /// - the platform or store error that stopped the run; the draft is
    ///   then `Failed` with the message in `last_error`
    #[instrument(skip(self, image), fields(has_image = image.is_some()))]
    pub async fn publish(
        &self,
        draft_id: &str,
        dry_run: bool,
        image: Option<ImageSource>,
    ) -> HeraldResult<PublishOutcome> {
        let draft = self.load_draft(draft_id).await?;

        if dry_run {
            let units = self.store.list_units(draft_id).await?;
            debug!(units = units.len(), "Dry run");
            return Ok(PublishOutcome::DryRun {
                draft_id: draft.id,
                status: draft.status,
                mode: draft.mode,
                texts: units.into_iter().map(|unit| unit.text).collect(),
            });
        }

        let Some(_guard) = self.locks.try_acquire(draft_id).await else {
            info!("Another run in this process holds the draft");
            return Ok(PublishOutcome::AlreadyPublishing {
                draft_id: draft.id,
            });
        };

        // Re-read under the lock; the first read may predate a finished run.
        let draft = self.load_draft(draft_id).await?;

        match (draft.status, &draft.root_external_id) {
            (DraftStatus::Publishing, _) => {
                info!("Draft is already publishing");
                return Ok(PublishOutcome::AlreadyPublishing { draft_id: draft.id });
            }
            (DraftStatus::Published, Some(root)) => {
                info!(root = %root, "Draft is already published");
                return Ok(PublishOutcome::AlreadyPublished {
                    root_external_id: root.clone(),
                    published_at: draft.published_at,
                    draft_id: draft.id,
                });
            }
            (status, _) if !status.is_publishable() => {
                return Err(InvalidStateError::new(draft_id, status.as_str()).into());
            }
            _ => {}
        }

        let units = self.store.list_units(draft_id).await?;
        if units.is_empty() {
            return Err(EmptyThreadError::new(format!("Draft {} has no units", draft_id)).into());
        }

        let draft = self
            .store
            .update_draft(
                draft_id,
                DraftUpdate::default()
                    .with_status(DraftStatus::Publishing)
                    .with_increment_attempts(true)
                    .with_last_error(None),
            )
            .await?;
        info!(attempt = draft.attempts, units = units.len(), "Publishing");

        match self.run(&draft, units, image).await {
            Ok(outcome) => Ok(outcome),
            Err(err) => {
                error!(error = %err, "Publish failed");
                let failed = DraftUpdate::default()
                    .with_status(DraftStatus::Failed)
                    .with_last_error(Some(err.to_string()));
                if let Err(update_err) = self.store.update_draft(draft_id, failed).await {
                    error!(error = %update_err, "Could not record publish failure");
                }
                Err(err)
            }
        }
    }

    async fn load_draft(&self, draft_id: &str) -> HeraldResult<ThreadDraft> {
        self.store
            .find_draft(draft_id)
            .await?
            .ok_or_else(|| NotFoundError::new("thread draft", draft_id).into())
    }

    async fn run(
        &self,
        draft: &ThreadDraft,
        units: Vec<PostUnit>,
        image: Option<ImageSource>,
    ) -> HeraldResult<PublishOutcome> {
        let all_posted = units.iter().all(PostUnit::is_posted);
        let mut posted_units = 0;

        let root = match (&draft.root_external_id, units.first()) {
            (Some(root), _) if all_posted => {
                debug!("Every unit already posted, finalizing");
                return self.finalize(draft, root.clone(), 0).await;
            }
            (Some(root), Some(first)) => {
                if !first.is_posted() {
                    // Root recorded on the draft but not yet on unit 1
                    self.store
                        .update_unit(first.id, PostUnitUpdate::posted(root.clone()))
                        .await?;
                }
                root.clone()
            }
            (None, Some(first)) => match &first.external_id {
                Some(existing) => {
                    info!(root = %existing, "Adopting posted first unit as root");
                    self.record_post(draft, existing, true).await?;
                    existing.clone()
                }
                None => {
                    let media = self.upload_image(image).await;
                    let posted = self
                        .backoff
                        .run("create_post", || {
                            self.client.create_post(&first.text, media.as_ref())
                        })
                        .await?;
                    self.store
                        .update_unit(first.id, PostUnitUpdate::posted(posted.external_id.clone()))
                        .await?;
                    self.record_post(draft, &posted.external_id, true).await?;
                    posted_units += 1;
                    info!(root = %posted.external_id, order = first.order, "Posted root");
                    posted.external_id
                }
            },
            (_, None) => {
                return Err(
                    EmptyThreadError::new(format!("Draft {} has no units", draft.id)).into(),
                );
            }
        };

        if draft.mode == PostingMode::Single {
            return self.finalize(draft, root, posted_units).await;
        }

        let units = self.store.list_units(&draft.id).await?;
        let mut parent = root.clone();
        for unit in &units {
            if let Some(existing) = &unit.external_id {
                parent = existing.clone();
                continue;
            }

            tokio::time::sleep(self.inter_post_delay).await;
            let posted = self
                .backoff
                .run("reply_to", || self.client.reply_to(&unit.text, &parent))
                .await?;
            self.store
                .update_unit(unit.id, PostUnitUpdate::posted(posted.external_id.clone()))
                .await?;
            self.record_post(draft, &posted.external_id, false).await?;
            posted_units += 1;
            info!(order = unit.order, external_id = %posted.external_id, "Posted reply");
            parent = posted.external_id;
        }

        self.finalize(draft, root, posted_units).await
    }

    /// Upload the root image. Failures are logged and the root goes out
    /// without media.
    async fn upload_image(&self, image: Option<ImageSource>) -> Option<MediaRef> {
        let image = image?;
        match self
            .backoff
            .run("upload_image", || self.client.upload_image(&image))
            .await
        {
            Ok(media) => {
                debug!(media = %media, "Uploaded image");
                Some(media)
            }
            Err(err) => {
                warn!(error = %err, "Image upload failed, posting without media");
                None
            }
        }
    }

    async fn record_post(
        &self,
        draft: &ThreadDraft,
        external_id: &str,
        is_root: bool,
    ) -> HeraldResult<()> {
        let mut update = DraftUpdate::default().with_last_external_id(external_id.to_string());
        if is_root {
            update = update.with_root_external_id(external_id.to_string());
        }
        self.store.update_draft(&draft.id, update).await?;
        Ok(())
    }

    async fn finalize(
        &self,
        draft: &ThreadDraft,
        root: String,
        posted_units: usize,
    ) -> HeraldResult<PublishOutcome> {
        let published_at = Utc::now();
        self.store
            .update_draft(
                &draft.id,
                DraftUpdate::default()
                    .with_status(DraftStatus::Published)
                    .with_published_at(published_at),
            )
            .await?;
        info!(root = %root, posted_units, "Thread published");
        Ok(PublishOutcome::Published {
            draft_id: draft.id.clone(),
            root_external_id: root,
            published_at,
            posted_units,
        })
    }
}
