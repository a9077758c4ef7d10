use crate::error::StorageError;
use crate::record::UrlRecord;
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, StorageError>;

/// Durable mirror of the registry's record collection.
///
/// The registry calls [`load`](RecordStore::load) once at startup and
/// [`save`](RecordStore::save) with the full collection after every
/// mutation. Callers treat failures as non-fatal.
#[async_trait]
pub trait RecordStore: Send + Sync + 'static {
    /// Reads the persisted records in their stored order.
    ///
    /// Implementations should return `Ok(vec![])` for missing data.
    async fn load(&self) -> Result<Vec<UrlRecord>>;

    /// Replaces the persisted collection with `records`.
    async fn save(&self, records: &[UrlRecord]) -> Result<()>;
}
