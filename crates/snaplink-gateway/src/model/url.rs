use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use snaplink_core::{ClickEvent, CreateRequest, UrlRecord};

#[derive(Debug, Deserialize)]
pub struct CreateUrlsRequest {
    pub urls: Vec<CreateRequest>,
}

#[derive(Debug, Serialize)]
pub struct CreateUrlsResponse {
    pub urls: Vec<UrlResponse>,
}

/// One rejected form field of one submitted request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub index: usize,
    pub field: &'static str,
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct UrlResponse {
    pub id: String,
    pub short_code: String,
    pub short_url: String,
    pub original_url: String,
    pub created_at: Timestamp,
    pub expires_at: Timestamp,
    pub validity_minutes: u32,
    pub expired: bool,
    pub click_count: u64,
    pub clicks: Vec<ClickEvent>,
}

impl UrlResponse {
    pub fn from_record(record: UrlRecord, base_url: &str, now: Timestamp) -> Self {
        Self {
            id: record.id.to_string(),
            short_url: record.short_code.to_url(base_url),
            short_code: record.short_code.to_string(),
            expired: record.is_expired(now),
            original_url: record.original_url,
            created_at: record.created_at,
            expires_at: record.expires_at,
            validity_minutes: record.validity_minutes,
            click_count: record.click_count,
            clicks: record.clicks,
        }
    }
}
