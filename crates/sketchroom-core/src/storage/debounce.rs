//! Debounced scene persistence.
//!
//! Every scene change restarts a fixed debounce window; the scene is
//! persisted once the window elapses without further changes. Failures are
//! logged and surfaced as a notification value, never retried.

use super::{Storage, StorageError, StorageResult};
use crate::scene::Scene;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Quiet period after the last change before a save fires.
pub const DEBOUNCE_DELAY: Duration = Duration::from_millis(1500);

/// A dismissible save-failure notification for the host UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveNotification {
    pub message: String,
}

impl SaveNotification {
    fn save_failed(err: &StorageError) -> Self {
        Self {
            message: format!("Could not save your changes: {}", err),
        }
    }
}

/// Debounced writer in front of a storage backend.
pub struct DebouncedSaver<S: Storage> {
    /// Storage backend.
    storage: Arc<S>,
    /// Debounce window.
    delay: Duration,
    /// Timestamp of the most recent unsaved change.
    last_change: Option<Instant>,
    /// Document being edited.
    document_id: String,
}

impl<S: Storage> DebouncedSaver<S> {
    /// Create a saver for the given document.
    pub fn new(storage: Arc<S>, document_id: impl Into<String>) -> Self {
        Self {
            storage,
            delay: DEBOUNCE_DELAY,
            last_change: None,
            document_id: document_id.into(),
        }
    }

    /// Override the debounce window.
    pub fn set_delay(&mut self, delay: Duration) {
        self.delay = delay;
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn document_id(&self) -> &str {
        &self.document_id
    }

    /// Note a scene change. Restarts the debounce window.
    pub fn mark_changed(&mut self) {
        self.last_change = Some(Instant::now());
    }

    /// Whether there is an unsaved change.
    pub fn is_dirty(&self) -> bool {
        self.last_change.is_some()
    }

    /// Whether the debounce window has elapsed quietly as of `now`.
    pub fn should_save_at(&self, now: Instant) -> bool {
        match self.last_change {
            Some(changed) => now.duration_since(changed) >= self.delay,
            None => false,
        }
    }

    /// Whether the debounce window has elapsed quietly.
    pub fn should_save(&self) -> bool {
        self.should_save_at(Instant::now())
    }

    /// Save the scene if the debounce window has elapsed.
    /// Returns true if a save was performed.
    pub async fn maybe_save(&mut self, scene: &Scene) -> StorageResult<bool> {
        if !self.should_save() {
            return Ok(false);
        }
        self.save(scene).await?;
        Ok(true)
    }

    /// Save immediately (e.g. on document close), regardless of the window.
    pub async fn save(&mut self, scene: &Scene) -> StorageResult<()> {
        // One attempt per change window, even on failure: no retries
        self.last_change = None;
        self.storage.save(&self.document_id, scene).await
    }

    /// Like [`maybe_save`](Self::maybe_save), but converts a failure into a
    /// notification value the host can show and dismiss. Editing continues
    /// either way.
    pub async fn maybe_save_notify(&mut self, scene: &Scene) -> Option<SaveNotification> {
        match self.maybe_save(scene).await {
            Ok(_) => None,
            Err(e) => {
                log::error!("Save of {} failed: {}", self.document_id, e);
                Some(SaveNotification::save_failed(&e))
            }
        }
    }

    /// Load the document's scene (seeds the editor on open).
    pub async fn load(&mut self) -> StorageResult<Scene> {
        let scene = self.storage.load(&self.document_id).await?;
        self.last_change = None;
        Ok(scene)
    }

    /// Get a reference to the storage backend.
    pub fn storage(&self) -> &Arc<S> {
        &self.storage
    }
}
