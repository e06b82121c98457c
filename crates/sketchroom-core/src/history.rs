//! Snapshot-based undo/redo history.

use crate::scene::Scene;

/// Maximum number of undo snapshots kept.
pub const MAX_UNDO_HISTORY: usize = 50;

/// Full-scene snapshot history.
///
/// Callers record the current scene immediately before every mutation; undo
/// and redo swap the live scene with a popped snapshot wholesale. The undo
/// stack is capped, dropping the oldest snapshot when full.
#[derive(Debug, Clone, Default)]
pub struct History {
    undo_stack: Vec<Scene>,
    redo_stack: Vec<Scene>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the pre-mutation scene. Clears the redo stack.
    pub fn record(&mut self, scene: &Scene) {
        self.undo_stack.push(scene.clone());
        if self.undo_stack.len() > MAX_UNDO_HISTORY {
            self.undo_stack.remove(0);
        }
        self.redo_stack.clear();
    }

    /// Undo: swap the live scene for the most recent snapshot.
    ///
    /// Returns false (leaving `scene` untouched) when there is nothing to
    /// undo.
    pub fn undo(&mut self, scene: &mut Scene) -> bool {
        match self.undo_stack.pop() {
            Some(snapshot) => {
                self.redo_stack.push(std::mem::replace(scene, snapshot));
                true
            }
            None => false,
        }
    }

    /// Redo: swap the live scene for the most recently undone snapshot.
    pub fn redo(&mut self, scene: &mut Scene) -> bool {
        match self.redo_stack.pop() {
            Some(snapshot) => {
                self.undo_stack.push(std::mem::replace(scene, snapshot));
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Number of recorded undo snapshots.
    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    /// Drop all snapshots (e.g. when loading a different document).
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
