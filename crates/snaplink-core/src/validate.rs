//! Side-effect free input checks shared by the form boundary and the registry.
//!
//! The `is_*` predicates answer yes/no. The `check_*` variants return the
//! human-readable reason shown next to the offending field.

use crate::shortcode::{MAX_LENGTH, MIN_LENGTH};
use crate::shortener::CreateRequest;
use serde::Serialize;
use url::Url;

pub const URL_REQUIRED: &str = "URL is required";
pub const URL_BAD_SCHEME: &str = "URL must start with http:// or https://";
pub const URL_MALFORMED: &str = "Please enter a valid URL";
pub const VALIDITY_NOT_POSITIVE: &str = "Validity must be a positive number";
pub const SHORT_CODE_MALFORMED: &str = "Short code must be 3-20 alphanumeric characters";

pub fn is_valid_url(url: &str) -> bool {
    check_url(url).is_ok()
}

pub fn is_valid_short_code(code: &str) -> bool {
    (MIN_LENGTH..=MAX_LENGTH).contains(&code.len()) && code.chars().all(|c| c.is_ascii_alphanumeric())
}

pub fn is_positive_minutes(minutes: i64) -> bool {
    minutes > 0
}

/// Accepts absolute `http`/`https` URLs only.
pub fn check_url(url: &str) -> Result<(), &'static str> {
    let url = url.trim();
    if url.is_empty() {
        return Err(URL_REQUIRED);
    }

    match Url::parse(url) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(()),
        Ok(_) => Err(URL_BAD_SCHEME),
        Err(_) => Err(URL_MALFORMED),
    }
}

pub fn check_short_code(code: &str) -> Result<(), &'static str> {
    if is_valid_short_code(code) {
        Ok(())
    } else {
        Err(SHORT_CODE_MALFORMED)
    }
}

pub fn check_validity_minutes(minutes: i64) -> Result<(), &'static str> {
    if is_positive_minutes(minutes) {
        Ok(())
    } else {
        Err(VALIDITY_NOT_POSITIVE)
    }
}

/// Per-field messages for one submitted request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldErrors {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_url: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validity_minutes: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_short_code: Option<&'static str>,
}

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.original_url.is_none() && self.validity_minutes.is_none() && self.custom_short_code.is_none()
    }

    /// `(field, message)` pairs in form order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        [
            ("original_url", self.original_url),
            ("validity_minutes", self.validity_minutes),
            ("custom_short_code", self.custom_short_code),
        ]
        .into_iter()
        .filter_map(|(field, message)| message.map(|m| (field, m)))
    }
}

/// Runs every field check on a submitted request.
///
/// Unlike the registry, the form boundary rejects an explicit non-positive
/// validity instead of defaulting it.
pub fn validate_form(request: &CreateRequest) -> FieldErrors {
    FieldErrors {
        original_url: check_url(&request.original_url).err(),
        validity_minutes: request
            .validity_minutes
            .and_then(|minutes| check_validity_minutes(minutes).err()),
        custom_short_code: request
            .custom_code()
            .and_then(|code| check_short_code(code).err()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_checks() {
        assert!(is_valid_url("https://example.com/a"));
        assert!(is_valid_url("http://localhost:8080/path?q=1"));

        assert_eq!(check_url(""), Err(URL_REQUIRED));
        assert_eq!(check_url("   "), Err(URL_REQUIRED));
        assert_eq!(check_url("not-a-url"), Err(URL_MALFORMED));
        assert_eq!(check_url("https://"), Err(URL_MALFORMED));
        assert_eq!(check_url("ftp://example.com"), Err(URL_BAD_SCHEME));
        assert_eq!(check_url("mailto:someone@example.com"), Err(URL_BAD_SCHEME));
    }

    #[test]
    fn short_code_checks() {
        assert!(is_valid_short_code("abc"));
        assert!(is_valid_short_code("promo1"));
        assert!(is_valid_short_code(&"Z".repeat(20)));

        assert!(!is_valid_short_code("ab"));
        assert!(!is_valid_short_code(&"Z".repeat(21)));
        assert!(!is_valid_short_code("has space"));
        assert!(!is_valid_short_code("dash-ed"));
        assert_eq!(check_short_code("ab"), Err(SHORT_CODE_MALFORMED));
    }

    #[test]
    fn minutes_checks() {
        assert!(is_positive_minutes(1));
        assert!(!is_positive_minutes(0));
        assert!(!is_positive_minutes(-5));
        assert_eq!(check_validity_minutes(0), Err(VALIDITY_NOT_POSITIVE));
    }

    #[test]
    fn validate_form_collects_every_field() {
        let request = CreateRequest::new("not-a-url")
            .with_validity(0)
            .with_custom_code("ab");

        let errors = validate_form(&request);
        assert_eq!(errors.original_url, Some(URL_MALFORMED));
        assert_eq!(errors.validity_minutes, Some(VALIDITY_NOT_POSITIVE));
        assert_eq!(errors.custom_short_code, Some(SHORT_CODE_MALFORMED));
        assert_eq!(errors.iter().count(), 3);
    }

    #[test]
    fn validate_form_accepts_defaults() {
        let request = CreateRequest::new("https://x.com").with_custom_code("   ");
        assert!(validate_form(&request).is_empty());
    }
}
