//! Authentication pattern detection
//!
//! A single pass over request records that clusters credential headers by
//! `(header name, scheme)` and remembers where each style was used.

use std::collections::HashMap;

use crate::domain::{AuthPattern, AuthScheme, TrafficRecord};

/// Headers carrying `Authorization`-style credentials
pub const AUTHORIZATION_HEADERS: &[&str] = &["authorization", "proxy-authorization"];

/// Header names used for API keys
pub const API_KEY_HEADERS: &[&str] = &["x-api-key", "api-key", "apikey"];

/// Classify an `Authorization` header value by its scheme prefix
pub fn classify_authorization(value: &str) -> AuthScheme {
    let scheme = value.trim_start().split_whitespace().next().unwrap_or_default();
    if scheme.eq_ignore_ascii_case("bearer") {
        AuthScheme::Bearer
    } else if scheme.eq_ignore_ascii_case("basic") {
        AuthScheme::Basic
    } else {
        AuthScheme::Custom
    }
}

/// Scheme for a credential header, `None` for ordinary headers
fn classify_header(name: &str, value: &str) -> Option<AuthScheme> {
    let lower = name.to_ascii_lowercase();
    if AUTHORIZATION_HEADERS.contains(&lower.as_str()) {
        Some(classify_authorization(value))
    } else if API_KEY_HEADERS.contains(&lower.as_str()) {
        Some(AuthScheme::ApiKey)
    } else {
        None
    }
}

/// Detect authentication patterns across all request records
pub fn detect_auth_patterns(records: &[TrafficRecord]) -> Vec<AuthPattern> {
    let mut patterns: Vec<AuthPattern> = Vec::new();
    let mut index: HashMap<(String, AuthScheme), usize> = HashMap::new();

    for record in records.iter().filter(|r| r.is_request()) {
        let url = record.url.as_deref().unwrap_or_default();

        for (name, value) in record.headers.iter() {
            let Some(scheme) = classify_header(name, value) else {
                continue;
            };

            let slot = *index.entry((name.to_ascii_lowercase(), scheme)).or_insert_with(|| {
                patterns.push(AuthPattern {
                    scheme,
                    header: name.to_string(),
                    endpoints: Vec::new(),
                    occurrences: 0,
                });
                patterns.len() - 1
            });

            let pattern = &mut patterns[slot];
            pattern.occurrences += 1;
            if !pattern.endpoints.iter().any(|seen| seen == url) {
                pattern.endpoints.push(url.to_string());
            }
        }
    }

    patterns
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_authorization() {
        assert_eq!(classify_authorization("Bearer abc.def.ghi"), AuthScheme::Bearer);
        assert_eq!(classify_authorization("bearer abc"), AuthScheme::Bearer);
        assert_eq!(classify_authorization("Basic dXNlcjpwYXNz"), AuthScheme::Basic);
        assert_eq!(classify_authorization("Digest username=x"), AuthScheme::Custom);
        assert_eq!(classify_authorization("rawtoken"), AuthScheme::Custom);
        assert_eq!(classify_authorization(""), AuthScheme::Custom);
    }

    #[test]
    fn test_clusters_by_header_and_scheme() {
        let records = vec![
            TrafficRecord::request("1", "GET", "/users").with_header("Authorization", "Bearer a"),
            TrafficRecord::request("2", "GET", "/orders").with_header("authorization", "Bearer b"),
            TrafficRecord::request("3", "GET", "/users").with_header("AUTHORIZATION", "Bearer c"),
            TrafficRecord::request("4", "GET", "/admin").with_header("Authorization", "Basic Zm9v"),
            TrafficRecord::request("5", "GET", "/keys").with_header("X-API-Key", "k1"),
            TrafficRecord::request("6", "GET", "/keys").with_header("apikey", "k2"),
        ];

        let patterns = detect_auth_patterns(&records);
        assert_eq!(patterns.len(), 4);

        assert_eq!(patterns[0].scheme, AuthScheme::Bearer);
        assert_eq!(patterns[0].header, "Authorization");
        assert_eq!(patterns[0].endpoints, vec!["/users", "/orders"]);
        assert_eq!(patterns[0].occurrences, 3);

        assert_eq!(patterns[1].scheme, AuthScheme::Basic);
        assert_eq!(patterns[2].scheme, AuthScheme::ApiKey);
        assert_eq!(patterns[2].header, "X-API-Key");
        assert_eq!(patterns[3].header, "apikey");
    }

    #[test]
    fn test_responses_are_ignored() {
        let records = vec![TrafficRecord::response("1", 200).with_header("Authorization", "Bearer x")];
        assert!(detect_auth_patterns(&records).is_empty());
    }

    #[test]
    fn test_unauthenticated_traffic() {
        let records = vec![TrafficRecord::request("1", "GET", "/public").with_header("Accept", "*/*")];
        assert!(detect_auth_patterns(&records).is_empty());
    }
}
