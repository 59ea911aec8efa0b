use serde::{Deserialize, Serialize};

use crate::models::item::TodoItem;

/// Current schema version
pub const CURRENT_VERSION: u32 = 1;

#[derive(Serialize, Deserialize, Debug)]
pub struct Store {
    pub version: u32,
    /// Pending items, kept in canonical sort order
    pub pending: Vec<TodoItem>,
    /// Completed items, in completion order
    pub completed: Vec<TodoItem>,
}

impl Default for Store {
    fn default() -> Self {
        Self {
            version: CURRENT_VERSION,
            pending: vec![],
            completed: vec![],
        }
    }
}

impl Store {
    /// Stable sort of the pending list by `(priority, project, description)`
    pub fn sort_pending(&mut self) {
        self.pending.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
    }

    /// Maps a user-facing 1-based index to a position in the pending list
    pub fn resolve_index(&self, index: usize) -> Option<usize> {
        if (1..=self.pending.len()).contains(&index) {
            Some(index - 1)
        } else {
            None
        }
    }
}
