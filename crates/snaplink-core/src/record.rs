use crate::shortcode::ShortCode;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use uuid::Uuid;

/// Opaque identifier assigned to a record at creation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(Uuid);

impl RecordId {
    /// Allocates a fresh random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single successful resolution of a short code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClickEvent {
    /// When the code was resolved.
    pub timestamp: Timestamp,
    /// Referrer of the visit, or `"direct"`.
    pub source: String,
    /// Coarse location label reported by the geolocation collaborator.
    pub location: String,
}

/// A stored short link together with its click analytics.
///
/// Field names are serialized in camelCase, which is the persisted shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlRecord {
    pub id: RecordId,
    /// The original URL that was shortened.
    pub original_url: String,
    pub short_code: ShortCode,
    pub created_at: Timestamp,
    /// `created_at + validity_minutes`. Never changes after creation.
    pub expires_at: Timestamp,
    pub validity_minutes: u32,
    /// Always equal to `clicks.len()`.
    pub click_count: u64,
    pub clicks: Vec<ClickEvent>,
}

impl UrlRecord {
    /// A record is expired strictly after its expiry instant.
    pub fn is_expired(&self, now: Timestamp) -> bool {
        now > self.expires_at
    }

    pub fn is_active(&self, now: Timestamp) -> bool {
        !self.is_expired(now)
    }

    /// Returns a copy of this record with `event` appended and the click
    /// counter bumped by one.
    pub fn with_click(&self, event: ClickEvent) -> Self {
        let mut next = self.clone();
        next.clicks.push(event);
        next.click_count = next.clicks.len() as u64;
        next
    }

    pub fn last_click(&self) -> Option<&ClickEvent> {
        self.clicks.last()
    }

    /// Whether the click counter agrees with the recorded events.
    pub fn is_consistent(&self) -> bool {
        self.click_count == self.clicks.len() as u64
    }
}
