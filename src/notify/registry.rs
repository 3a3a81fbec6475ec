//! Registry of error notifications currently on screen

use std::collections::HashSet;

use crate::form::ErrorId;

/// Set of shown error ids, owned by one form session.
///
/// Holds at most one entry per id.
#[derive(Debug, Clone, Default)]
pub struct NotificationRegistry {
    shown: HashSet<ErrorId>,
}

impl NotificationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `id` as shown. Returns `true` only if it was not already shown.
    pub fn register(&mut self, id: &ErrorId) -> bool {
        if self.shown.contains(id) {
            return false;
        }
        self.shown.insert(id.clone())
    }

    /// Forget `id`. Returns `true` if it was shown.
    pub fn unregister(&mut self, id: &ErrorId) -> bool {
        self.shown.remove(id)
    }

    pub fn contains(&self, id: &ErrorId) -> bool {
        self.shown.contains(id)
    }

    pub fn len(&self) -> usize {
        self.shown.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shown.is_empty()
    }
}
