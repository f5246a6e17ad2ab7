//! Deterministic endpoint naming
//!
//! Tags, summaries and operation ids derived purely from the path template
//! and method.

use http::StatusCode;

use super::path_normalizer::placeholder_name;

/// Naming facets for one endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointMetadata {
    pub tag: String,
    pub summary: String,
    pub operation_id: String,
}

impl EndpointMetadata {
    pub fn derive(method: &str, template: &str) -> Self {
        Self {
            tag: derive_tag(template),
            summary: derive_summary(method, template),
            operation_id: derive_operation_id(method, template),
        }
    }
}

fn literal_segments(template: &str) -> impl Iterator<Item = &str> {
    template.split('/').filter(|s| !s.is_empty() && placeholder_name(s).is_none())
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Capitalized first non-parameter segment, `Default` for the root
pub fn derive_tag(template: &str) -> String {
    literal_segments(template).next().map(capitalize).unwrap_or_else(|| "Default".to_string())
}

/// Verb used in summaries
pub fn method_verb(method: &str) -> String {
    match method.to_ascii_uppercase().as_str() {
        "GET" => "Get".to_string(),
        "POST" => "Create".to_string(),
        "PUT" => "Update".to_string(),
        "PATCH" => "Modify".to_string(),
        "DELETE" => "Delete".to_string(),
        _ => method.to_string(),
    }
}

/// `{Verb} {lastResourceSegment}`
pub fn derive_summary(method: &str, template: &str) -> String {
    let resource = literal_segments(template).last().unwrap_or("root");
    format!("{} {}", method_verb(method), resource)
}

/// `{method}_{literal_segments}` restricted to identifier-safe characters
pub fn derive_operation_id(method: &str, template: &str) -> String {
    let segments: Vec<&str> = literal_segments(template).collect();
    let resource = if segments.is_empty() { "root".to_string() } else { segments.join("_") };
    format!("{}_{}", method.to_ascii_lowercase(), resource)
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

/// `get_user_orders` → `GetUserOrders`
pub fn pascal_case(identifier: &str) -> String {
    identifier.split('_').filter(|part| !part.is_empty()).map(capitalize).collect()
}

/// Human description for a status code without observed status text
pub fn status_description(status: u16) -> String {
    StatusCode::from_u16(status)
        .ok()
        .and_then(|code| code.canonical_reason())
        .map(str::to_string)
        .unwrap_or_else(|| format!("Status {}", status))
}
