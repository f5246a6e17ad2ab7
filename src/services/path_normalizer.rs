//! Path normalization module for endpoint aggregation
//!
//! This module converts concrete request URLs into parameterized path
//! templates, so that `/users/1` and `/users/2` cluster into one logical
//! endpoint `/users/{id}`.
//!
//! ## Supported Parameter Types
//!
//! - **UUIDs**: `/orders/550e8400-e29b-41d4-a716-446655440000` → `/orders/{id}`
//! - **Numeric IDs**: `/users/123` → `/users/{id}`
//!
//! UUIDs are checked before numeric ids. Normalization never fails: URLs the
//! `url` crate rejects fall back to regex-based path extraction.

use serde::Serialize;
use std::borrow::Cow;
use url::Url;

use crate::utils::{self, URL_PARTS_REGEX};

/// Placeholder name substituted for identifier-like segments
pub const ID_PLACEHOLDER: &str = "id";

/// A parameterized path template
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct NormalizedPath {
    pub template: String,
    /// Placeholder names in template order
    pub parameters: Vec<String>,
}

/// The pieces of a request URL the engine cares about
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlParts {
    /// Decoded path, always starting with `/`
    pub path: String,
    /// Decoded query pairs in URL order
    pub query: Vec<(String, String)>,
    /// `scheme://authority` for absolute URLs
    pub origin: Option<String>,
}

/// Split a raw URL (absolute or relative) into path, query and origin
pub fn split_url(raw: &str) -> UrlParts {
    parse_with_url_crate(raw.trim()).unwrap_or_else(|| parse_best_effort(raw.trim()))
}

fn parse_with_url_crate(raw: &str) -> Option<UrlParts> {
    let (url, absolute) = match Url::parse(raw) {
        Ok(url) if !url.cannot_be_a_base() => (url, true),
        _ => {
            let base = Url::parse("http://localhost/").ok()?;
            let joined = base.join(raw).ok()?;
            if joined.cannot_be_a_base() || joined.host_str() != Some("localhost") {
                return None;
            }
            (joined, false)
        }
    };

    let path = url.path().split('/').map(decode_segment).collect::<Vec<_>>().join("/");
    let query =
        url.query_pairs().map(|(name, value)| (name.into_owned(), value.into_owned())).collect();
    let origin = if absolute { url.host_str().map(|host| origin_of(&url, host)) } else { None };

    Some(UrlParts { path, query, origin })
}

/// `scheme://host[:port]` for any scheme with an authority (http, ws, mqtt, grpc, ...)
fn origin_of(url: &Url, host: &str) -> String {
    match url.port() {
        Some(port) => format!("{}://{}:{}", url.scheme(), host, port),
        None => format!("{}://{}", url.scheme(), host),
    }
}

/// Percent-decode one path segment, keeping it as-is when it is not valid UTF-8.
/// An encoded `/` stays encoded so it never becomes a segment boundary.
fn decode_segment(segment: &str) -> Cow<'_, str> {
    match urlencoding::decode(segment) {
        Ok(decoded) if decoded.contains('/') => Cow::Owned(decoded.replace('/', "%2F")),
        Ok(decoded) => decoded,
        Err(_) => Cow::Borrowed(segment),
    }
}

fn parse_best_effort(raw: &str) -> UrlParts {
    let Some(caps) = URL_PARTS_REGEX.captures(raw) else {
        return UrlParts { path: "/".to_string(), ..Default::default() };
    };

    let origin = match (caps.get(1), caps.get(2)) {
        (Some(scheme), Some(authority)) if !authority.as_str().is_empty() => Some(format!(
            "{}://{}",
            scheme.as_str().to_ascii_lowercase(),
            authority.as_str()
        )),
        _ => None,
    };

    let raw_path = caps.get(3).map_or("", |m| m.as_str());
    let path = if raw_path.starts_with('/') {
        raw_path.to_string()
    } else {
        format!("/{}", raw_path)
    };

    let query = caps
        .get(4)
        .map(|q| {
            url::form_urlencoded::parse(q.as_str().as_bytes())
                .map(|(name, value)| (name.into_owned(), value.into_owned()))
                .collect()
        })
        .unwrap_or_default();

    UrlParts { path, query, origin }
}

/// Name of a `{placeholder}` segment, if the segment is one
pub fn placeholder_name(segment: &str) -> Option<&str> {
    segment
        .strip_prefix('{')
        .and_then(|rest| rest.strip_suffix('}'))
        .filter(|name| !name.is_empty())
}

/// Replace identifier-like segments of an already extracted path
pub fn normalize_template(path: &str) -> NormalizedPath {
    let mut parameters = Vec::new();
    let segments: Vec<String> = path
        .split('/')
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            // UUID first: its digit groups must never be matched piecemeal
            let normalized = if utils::is_uuid(segment) || utils::is_numeric(segment) {
                format!("{{{}}}", ID_PLACEHOLDER)
            } else {
                segment.to_string()
            };
            if let Some(name) = placeholder_name(&normalized) {
                parameters.push(name.to_string());
            }
            normalized
        })
        .collect();

    NormalizedPath { template: format!("/{}", segments.join("/")), parameters }
}

/// Normalize a raw request URL into a path template
///
/// # Examples
///
/// ```
/// use apiscope::services::path_normalizer::normalize_path;
///
/// assert_eq!(normalize_path("/users/123").template, "/users/{id}");
/// assert_eq!(
///     normalize_path("https://api.example.com/orders/550e8400-e29b-41d4-a716-446655440000/").template,
///     "/orders/{id}"
/// );
/// assert_eq!(normalize_path("/users/{id}").template, "/users/{id}");
/// ```
pub fn normalize_path(raw: &str) -> NormalizedPath {
    normalize_template(&split_url(raw).path)
}
