use serde::{Deserialize, Serialize};

/// Parameters for creating one shortened URL.
///
/// This is the raw, unvalidated input as submitted. The registry validates
/// it and resolves the defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateRequest {
    /// The original URL to be shortened.
    pub original_url: String,
    /// Validity window in minutes. Absent or non-positive means the default.
    #[serde(default)]
    pub validity_minutes: Option<i64>,
    /// Optional custom short code for the shortened URL.
    #[serde(default)]
    pub custom_short_code: Option<String>,
}

impl CreateRequest {
    pub fn new(original_url: impl Into<String>) -> Self {
        Self {
            original_url: original_url.into(),
            ..Default::default()
        }
    }

    pub fn with_validity(mut self, minutes: i64) -> Self {
        self.validity_minutes = Some(minutes);
        self
    }

    pub fn with_custom_code(mut self, code: impl Into<String>) -> Self {
        self.custom_short_code = Some(code.into());
        self
    }

    /// The custom short code with surrounding whitespace removed, or `None`
    /// when nothing meaningful was supplied.
    pub fn custom_code(&self) -> Option<&str> {
        self.custom_short_code
            .as_deref()
            .map(str::trim)
            .filter(|code| !code.is_empty())
    }
}
