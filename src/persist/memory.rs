//! Volatile sink for tests and callers that do not need durability.

use std::sync::{Arc, Mutex, MutexGuard};

use hashbrown::HashMap;

use super::{PersistError, PersistResult, StateSink};

#[derive(Debug, Default)]
struct Docs {
    by_key: HashMap<String, String>,
    writes: usize,
}

/// In-memory [`StateSink`] that counts writes.
///
/// Clones share the same storage, so a caller can keep a handle after moving
/// the sink into a store.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    docs: Arc<Mutex<Docs>>,
}

impl MemorySink {
    /// Empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sink pre-loaded with `payload` under `key`.
    pub fn with_document(key: &str, payload: impl Into<String>) -> Self {
        let sink = Self::new();
        if let Ok(mut docs) = sink.lock() {
            docs.by_key.insert(key.to_string(), payload.into());
        }
        sink
    }

    /// Stored payload for `key`.
    pub fn document(&self, key: &str) -> Option<String> {
        self.lock().ok()?.by_key.get(key).cloned()
    }

    /// Number of successful `store` calls.
    pub fn writes(&self) -> usize {
        self.lock().map(|docs| docs.writes).unwrap_or(0)
    }

    fn lock(&self) -> PersistResult<MutexGuard<'_, Docs>> {
        self.docs
            .lock()
            .map_err(|_| PersistError::Message("memory sink lock poisoned".to_string()))
    }
}

impl StateSink for MemorySink {
    fn load(&self, key: &str) -> PersistResult<Option<String>> {
        Ok(self.lock()?.by_key.get(key).cloned())
    }

    fn store(&mut self, key: &str, payload: &str) -> PersistResult<()> {
        let mut docs = self.lock()?;
        docs.by_key.insert(key.to_string(), payload.to_string());
        docs.writes += 1;
        Ok(())
    }
}
