use crates::domain::value_objects::storage::DirectUploadConfig;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Shared handle mapping egress ids to their out-of-band upload destination.
/// The agent registers a destination when it starts a direct-upload
/// recording; the listener consumes it exactly once when the session
/// completes. Held only in process memory.
#[derive(Clone, Default)]
pub struct DirectUploadRegistry {
    inner: Arc<Mutex<HashMap<String, DirectUploadConfig>>>,
}

impl DirectUploadRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, egress_id: String, config: DirectUploadConfig) {
        self.inner
            .lock()
            .expect("direct upload registry poisoned")
            .insert(egress_id, config);
    }

    /// Removes and returns the destination for the given egress id. Consuming
    /// the entry is what makes the upload at-most-once per process lifetime.
    pub fn take(&self, egress_id: &str) -> Option<DirectUploadConfig> {
        self.inner
            .lock()
            .expect("direct upload registry poisoned")
            .remove(egress_id)
    }

    pub fn is_empty(&self) -> bool {
        self.inner
            .lock()
            .expect("direct upload registry poisoned")
            .is_empty()
    }
}
