use crate::error::{Result, ShortenerError};
use snaplink_core::{ClickEvent, RecordId, ShortCode, UrlRecord};
use std::collections::HashMap;
use tracing::warn;

/// The registry's record collection and its lookup indexes.
///
/// All mutations go through the named transitions `apply_load`,
/// `apply_create`, `apply_click` and `apply_update`; each one either applies
/// fully or leaves the state untouched.
#[derive(Debug, Default, Clone)]
pub struct RegistryState {
    records: Vec<UrlRecord>,
    by_code: HashMap<ShortCode, usize>,
    by_id: HashMap<RecordId, usize>,
}

/// What `apply_load` kept and what it had to discard or repair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub loaded: usize,
    pub dropped_duplicates: usize,
    pub repaired_counters: usize,
}

impl RegistryState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[UrlRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Codes stay reserved for as long as their record exists, expired or not.
    pub fn contains_code(&self, code: &str) -> bool {
        self.by_code.contains_key(code)
    }

    pub fn find_by_code(&self, code: &str) -> Option<&UrlRecord> {
        self.by_code.get(code).map(|&i| &self.records[i])
    }

    pub fn find_by_id(&self, id: &RecordId) -> Option<&UrlRecord> {
        self.by_id.get(id).map(|&i| &self.records[i])
    }

    /// Replaces the whole collection with persisted records.
    ///
    /// The first record for a given code or id wins; later duplicates are
    /// dropped. Click counters that disagree with the click list are reset
    /// to the list length.
    pub fn apply_load(&mut self, records: Vec<UrlRecord>) -> LoadReport {
        let mut next = RegistryState::new();
        let mut report = LoadReport::default();

        for mut record in records {
            if next.contains_code(record.short_code.as_str()) || next.by_id.contains_key(&record.id) {
                warn!(code = %record.short_code, id = %record.id, "dropping duplicate persisted record");
                report.dropped_duplicates += 1;
                continue;
            }
            if !record.is_consistent() {
                warn!(
                    code = %record.short_code,
                    click_count = record.click_count,
                    clicks = record.clicks.len(),
                    "repairing click counter of persisted record"
                );
                record.click_count = record.clicks.len() as u64;
                report.repaired_counters += 1;
            }
            next.push(record);
        }

        report.loaded = next.len();
        *self = next;
        report
    }

    /// Appends freshly created records.
    ///
    /// Fails without inserting anything if any code is already present or
    /// repeated within `records`.
    pub fn apply_create(&mut self, records: Vec<UrlRecord>) -> Result<()> {
        let mut seen = std::collections::HashSet::new();
        for record in &records {
            let code = record.short_code.as_str();
            if self.contains_code(code) || !seen.insert(code) {
                return Err(ShortenerError::ShortCodeTaken(code.to_string()));
            }
        }

        for record in records {
            self.push(record);
        }
        Ok(())
    }

    /// Replaces the record with the same id.
    ///
    /// Only click recording is a legal change: identity and timing fields
    /// must be untouched and the stored clicks must be a prefix of the new
    /// ones. A record whose stored clicks were extended by someone else since
    /// it was read fails with [`ShortenerError::Conflict`].
    pub fn apply_update(&mut self, record: UrlRecord) -> Result<()> {
        let index = *self
            .by_id
            .get(&record.id)
            .ok_or_else(|| ShortenerError::RecordNotFound(record.id.to_string()))?;
        let current = &self.records[index];

        check_immutable(current, &record)?;

        if !record.is_consistent() {
            return Err(ShortenerError::InvalidUpdate(format!(
                "click_count {} does not match {} recorded clicks",
                record.click_count,
                record.clicks.len()
            )));
        }

        if !record.clicks.starts_with(&current.clicks) {
            return Err(ShortenerError::Conflict(record.id.to_string()));
        }

        self.records[index] = record;
        Ok(())
    }

    /// Appends one click to the record with `id` and returns the result.
    ///
    /// The event is stamped no earlier than the record's last click. A record
    /// that is expired at that instant is left alone and reported as
    /// [`ShortenerError::Expired`].
    pub fn apply_click(&mut self, id: &RecordId, mut event: ClickEvent) -> Result<&UrlRecord> {
        let index = *self
            .by_id
            .get(id)
            .ok_or_else(|| ShortenerError::RecordNotFound(id.to_string()))?;
        let record = &mut self.records[index];

        if let Some(last) = record.last_click() {
            event.timestamp = event.timestamp.max(last.timestamp);
        }
        if record.is_expired(event.timestamp) {
            return Err(ShortenerError::Expired {
                code: record.short_code.to_string(),
                expires_at: record.expires_at,
            });
        }

        record.clicks.push(event);
        record.click_count = record.clicks.len() as u64;
        Ok(&*record)
    }

    fn push(&mut self, record: UrlRecord) {
        let index = self.records.len();
        self.by_code.insert(record.short_code.clone(), index);
        self.by_id.insert(record.id, index);
        self.records.push(record);
    }
}

fn check_immutable(current: &UrlRecord, next: &UrlRecord) -> Result<()> {
    if current.short_code != next.short_code {
        return Err(ShortenerError::ImmutableField("shortCode"));
    }
    if current.original_url != next.original_url {
        return Err(ShortenerError::ImmutableField("originalUrl"));
    }
    if current.created_at != next.created_at {
        return Err(ShortenerError::ImmutableField("createdAt"));
    }
    if current.expires_at != next.expires_at {
        return Err(ShortenerError::ImmutableField("expiresAt"));
    }
    if current.validity_minutes != next.validity_minutes {
        return Err(ShortenerError::ImmutableField("validityMinutes"));
    }
    Ok(())
}
