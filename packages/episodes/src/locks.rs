// ABOUTME: Per-episode mutual exclusion for position-changing operations
// ABOUTME: Serializes read-reconcile-write sequences that touch the same episode

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tracing::debug;

/// Registry of one async mutex per episode id. Holding the guard returned
/// by [`EpisodeLocks::lock`] excludes every other mutation of that episode
/// made through the same registry.
#[derive(Clone, Default)]
pub struct EpisodeLocks {
    inner: Arc<Mutex<HashMap<i64, Arc<AsyncMutex<()>>>>>,
}

impl EpisodeLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn lock(&self, episode_id: i64) -> OwnedMutexGuard<()> {
        let mutex = {
            let mut locks = self
                .inner
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());

            // Drop entries nobody holds or waits on
            locks.retain(|_, m| Arc::strong_count(m) > 1);

            locks.entry(episode_id).or_default().clone()
        };

        debug!("Waiting for lock on episode {}", episode_id);
        mutex.lock_owned().await
    }

    /// Number of episodes with a live lock entry
    pub fn active(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .values()
            .filter(|m| Arc::strong_count(m) > 1)
            .count()
    }
}
