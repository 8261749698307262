//! Single-record playback state store.

use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::AppResult;
use crate::models::PlaybackState;

/// Owns the one current `PlaybackState`. Records are swapped whole under the
/// write lock, so readers only ever see a complete record.
#[derive(Clone, Default)]
pub struct StateStore {
    current: Arc<RwLock<Arc<PlaybackState>>>,
}

impl StateStore {
    /// New store holding `idle`.
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn snapshot(&self) -> PlaybackState {
        self.current.read().await.as_ref().clone()
    }

    /// Overwrite the current record, e.g. when the host learns the surface finished.
    pub async fn replace(&self, state: PlaybackState) {
        let mut current = self.current.write().await;
        debug!(status = ?state.status, "state replaced");
        *current = Arc::new(state);
    }

    /// Compute and install the next record while holding the write lock.
    /// On error the current record is left untouched.
    pub async fn update<T, F>(&self, f: F) -> AppResult<T>
    where
        F: FnOnce(&PlaybackState) -> AppResult<(PlaybackState, T)>,
    {
        let mut current = self.current.write().await;
        let (next, out) = f(current.as_ref())?;
        *current = Arc::new(next);
        Ok(out)
    }
}
