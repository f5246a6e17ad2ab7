//! Utility functions and helpers
//!
//! Shared value-shape patterns used by both path normalization and string
//! format detection, so a "UUID" means the same thing everywhere.

use regex::Regex;
use std::sync::LazyLock;

/// UUID: 8-4-4-4-12 hex characters
pub static UUID_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
        .expect("UUID regex compilation failed")
});

/// Pure digits
pub static NUMERIC_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+$").expect("Numeric regex compilation failed"));

/// Loose email shape: local@domain.tld with no whitespace
pub static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Email regex compilation failed")
});

/// ISO 8601 date-time with optional fraction and offset
pub static DATE_TIME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}T[0-9]{2}:[0-9]{2}:[0-9]{2}(\.[0-9]+)?(Z|[+-][0-9]{2}:?[0-9]{2})?$")
        .expect("Date-time regex compilation failed")
});

/// ISO 8601 calendar date (YYYY-MM-DD)
pub static DATE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("Date regex compilation failed"));

/// Best-effort URL splitter: optional `scheme://authority`, then path, then query
pub static URL_PARTS_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:([A-Za-z][A-Za-z0-9+.\-]*)://([^/?#]*))?([^?#]*)(?:\?([^#]*))?")
        .expect("URL parts regex compilation failed")
});

pub fn is_uuid(value: &str) -> bool {
    UUID_REGEX.is_match(value)
}

pub fn is_numeric(value: &str) -> bool {
    NUMERIC_REGEX.is_match(value)
}

pub fn is_email(value: &str) -> bool {
    EMAIL_REGEX.is_match(value)
}

pub fn is_date_time(value: &str) -> bool {
    DATE_TIME_REGEX.is_match(value)
}

pub fn is_date(value: &str) -> bool {
    DATE_REGEX.is_match(value)
}

pub fn is_http_uri(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}
