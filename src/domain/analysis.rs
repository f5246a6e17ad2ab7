//! Analysis output
//!
//! [`AnalysisResult`] is the single model handed to API document emitters. It is built
//! fresh by every analysis run.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use uuid::Uuid;

use super::endpoint::Endpoint;
use crate::schema::SchemaNode;

/// Authentication scheme inferred from a credential header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum AuthScheme {
    Bearer,
    Basic,
    ApiKey,
    Custom,
}

/// A cluster of requests carrying the same credential style
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthPattern {
    pub scheme: AuthScheme,
    /// Header name as first observed
    pub header: String,
    /// Distinct request URLs that carried it, in first-seen order
    pub endpoints: Vec<String>,
    /// Number of requests that carried it
    pub occurrences: usize,
}

/// A header present on a large share of captured requests
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommonHeader {
    pub name: String,
    pub occurrences: usize,
    /// Share of requests carrying the header, 0.0 to 1.0
    pub frequency: f64,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
}

/// Run metadata
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisMetadata {
    pub run_id: Uuid,
    pub total_records: usize,
    pub request_count: usize,
    pub response_count: usize,
    pub pair_count: usize,
    pub endpoint_count: usize,
    /// Distinct protocol labels, first-seen order
    pub protocols: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

/// Inferred API model
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub endpoints: Vec<Endpoint>,
    /// Named component schemas
    pub components: BTreeMap<String, SchemaNode>,
    pub auth_patterns: Vec<AuthPattern>,
    pub common_headers: Vec<CommonHeader>,
    /// Distinct `scheme://authority` origins, first-seen order
    pub base_paths: Vec<String>,
    pub metadata: AnalysisMetadata,
}

impl AnalysisResult {
    /// Look up an endpoint by method and normalized path
    pub fn endpoint(&self, method: &str, path: &str) -> Option<&Endpoint> {
        self.endpoints.iter().find(|e| e.method.eq_ignore_ascii_case(method) && e.path == path)
    }

    pub fn common_header(&self, name: &str) -> Option<&CommonHeader> {
        self.common_headers.iter().find(|h| h.name.eq_ignore_ascii_case(name))
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }
}
