//! Per-draft publish locks.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// In-process mutual exclusion for publish runs, one lock per draft id.
///
/// Backs the persisted `Publishing` status within one process. Separate
/// processes still rely on the status alone.
#[derive(Debug, Clone, Default)]
pub struct DraftLocks {
    inflight: Arc<Mutex<HashMap<String, Arc<Mutex<()>>>>>,
}

impl DraftLocks {
    /// Create an empty lock table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the lock for `draft_id` without waiting.
    ///
    /// Returns `None` while another run holds it. The lock is released when
    /// the guard drops.
    pub async fn try_acquire(&self, draft_id: &str) -> Option<OwnedMutexGuard<()>> {
        let lock = {
            let mut inflight = self.inflight.lock().await;
            Arc::clone(
                inflight
                    .entry(draft_id.to_string())
                    .or_insert_with(|| Arc::new(Mutex::new(()))),
            )
        };
        lock.try_lock_owned().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn second_acquire_fails_until_release() {
        let locks = DraftLocks::new();

        let guard = locks.try_acquire("draft_1").await;
        assert!(guard.is_some());
        assert!(locks.try_acquire("draft_1").await.is_none());
        assert!(locks.try_acquire("draft_2").await.is_some());

        drop(guard);
        assert!(locks.try_acquire("draft_1").await.is_some());
    }
}
