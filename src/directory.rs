//! Process-local name directory, used once per participant at startup:
//! the service registers itself under a well-known name, and each client
//! looks that name up before its first call.

use std::sync::Mutex;

use rustc_hash::FxHashMap;

use crate::transport::ServiceHandle;

#[derive(Debug, Default)]
pub struct Directory {
    entries: Mutex<FxHashMap<String, ServiceHandle>>,
}

impl Directory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a handle under `name`, replacing any previous holder.
    pub fn register(&self, name: &str, handle: ServiceHandle) {
        let mut entries = self.entries.lock().expect("directory lock poisoned");
        entries.insert(name.to_owned(), handle);
    }

    pub fn lookup(&self, name: &str) -> Option<ServiceHandle> {
        let entries = self.entries.lock().expect("directory lock poisoned");
        entries.get(name).cloned()
    }
}
