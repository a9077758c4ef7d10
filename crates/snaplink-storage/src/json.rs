use async_trait::async_trait;
use snaplink_core::store::{RecordStore, Result};
use snaplink_core::{StorageError, UrlRecord};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Stores the record collection as a JSON array in a single file.
///
/// A missing file loads as an empty collection, and so does a file that
/// cannot be parsed (with a warning). Saves write a sibling temp file and
/// rename it over the target, so a crash mid-save leaves the previous
/// snapshot intact.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "records.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl RecordStore for JsonFileStore {
    async fn load(&self) -> Result<Vec<UrlRecord>> {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "store file missing; starting empty");
                return Ok(Vec::new());
            }
            Err(err) => return Err(err.into()),
        };

        match serde_json::from_slice::<Vec<UrlRecord>>(&raw) {
            Ok(records) => {
                debug!(path = %self.path.display(), count = records.len(), "loaded records");
                Ok(records)
            }
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "store file is corrupt; starting empty");
                Ok(Vec::new())
            }
        }
    }

    async fn save(&self, records: &[UrlRecord]) -> Result<()> {
        let body = serde_json::to_vec_pretty(records)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let temp = self.temp_path();
        tokio::fs::write(&temp, body).await?;
        tokio::fs::rename(&temp, &self.path).await?;

        debug!(path = %self.path.display(), count = records.len(), "saved records");
        Ok(())
    }
}
