//! Cross-session cancellation requests.

use std::sync::{Arc, Mutex, PoisonError};

/// A single pending "cancel the trade for this user" slot, shared between
/// the sessions and whoever receives cancel commands. Clones share the slot.
#[derive(Debug, Clone, Default)]
pub struct CancelSlot {
    pending: Arc<Mutex<Option<u64>>>,
}

impl CancelSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask for `user_id`'s trade to be cancelled. Replaces any earlier
    /// request and returns the user it displaced.
    pub fn request(&self, user_id: u64) -> Option<u64> {
        self.lock().replace(user_id)
    }

    /// If the pending request is for `user_id`, clear it and return true.
    pub fn take_for(&self, user_id: u64) -> bool {
        let mut pending = self.lock();
        if *pending == Some(user_id) {
            *pending = None;
            true
        } else {
            false
        }
    }

    pub fn pending(&self) -> Option<u64> {
        *self.lock()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<u64>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
