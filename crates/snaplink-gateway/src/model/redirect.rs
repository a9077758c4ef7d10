use jiff::Timestamp;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize)]
pub struct RedirectParams {
    /// Skip the countdown page and answer with a redirect right away.
    #[serde(default)]
    pub go: Option<String>,
}

impl RedirectParams {
    pub fn immediate(&self) -> bool {
        matches!(self.go.as_deref(), Some("1" | "true" | "yes"))
    }
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ResolveResponse {
    Redirect {
        url: String,
        countdown_secs: u64,
        click_count: u64,
    },
    NotFound {
        message: String,
    },
    Expired {
        expires_at: Timestamp,
        message: String,
    },
}
