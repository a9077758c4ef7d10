use async_trait::async_trait;
use parking_lot::Mutex;
use snaplink_core::store::{RecordStore, Result};
use snaplink_core::UrlRecord;
use std::sync::atomic::{AtomicUsize, Ordering};

/// In-memory implementation of [`RecordStore`].
///
/// Holds the last saved snapshot. Nothing survives the process, so this is
/// meant for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    snapshot: Mutex<Vec<UrlRecord>>,
    saves: AtomicUsize,
}

impl InMemoryStore {
    /// Creates a new, empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds `records`, as if saved earlier.
    pub fn with_records(records: Vec<UrlRecord>) -> Self {
        Self {
            snapshot: Mutex::new(records),
            saves: AtomicUsize::new(0),
        }
    }

    /// Returns a copy of the current snapshot.
    pub fn snapshot(&self) -> Vec<UrlRecord> {
        self.snapshot.lock().clone()
    }

    /// Number of successful `save` calls.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecordStore for InMemoryStore {
    async fn load(&self) -> Result<Vec<UrlRecord>> {
        Ok(self.snapshot())
    }

    async fn save(&self, records: &[UrlRecord]) -> Result<()> {
        *self.snapshot.lock() = records.to_vec();
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
