//! Traffic analysis engine
//!
//! [`TrafficAnalyzer`] wires the pipeline together: pair records, fold pairs
//! into endpoints, then derive components, auth patterns, common headers,
//! base paths and run metadata. It holds no state between calls; each call
//! builds its own working maps and drops them on return.

use chrono::Utc;
use std::collections::{BTreeMap, HashSet};
use tracing::info;
use uuid::Uuid;

use super::auth_detector::detect_auth_patterns;
use super::endpoint_aggregator::EndpointAggregator;
use super::header_detector::detect_common_headers;
use super::metadata::pascal_case;
use super::path_normalizer::split_url;
use super::transaction_pairer::pair_transactions;
use crate::domain::{AnalysisMetadata, AnalysisResult, Endpoint, TrafficRecord};
use crate::schema::SchemaNode;

/// Stateless traffic-to-schema inference engine
#[derive(Debug, Clone, Copy, Default)]
pub struct TrafficAnalyzer;

impl TrafficAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Infer an API model from captured traffic.
    ///
    /// Never fails: malformed records degrade to best-effort inference and
    /// an empty input yields an empty result.
    pub fn analyze(&self, records: &[TrafficRecord]) -> AnalysisResult {
        let run_id = Uuid::new_v4();
        let span = crate::analysis_span!(run_id, records.len());
        let _guard = span.enter();

        let pairs = pair_transactions(records);
        let mut aggregator = EndpointAggregator::new();
        let mut folded = 0usize;
        for pair in &pairs {
            if aggregator.observe(pair) {
                folded += 1;
            }
        }

        let mut endpoints = aggregator.into_endpoints();
        dedupe_operation_ids(&mut endpoints);

        let components = build_components(&endpoints);
        let auth_patterns = detect_auth_patterns(records);
        let common_headers = detect_common_headers(records);

        let request_count = records.iter().filter(|r| r.is_request()).count();
        let metadata = AnalysisMetadata {
            run_id,
            total_records: records.len(),
            request_count,
            response_count: records.len() - request_count,
            pair_count: pairs.len(),
            endpoint_count: endpoints.len(),
            protocols: collect_protocols(records),
            generated_at: Utc::now(),
        };

        span.record("endpoint_count", endpoints.len());
        info!(
            pairs = pairs.len(),
            folded_pairs = folded,
            endpoints = endpoints.len(),
            components = components.len(),
            auth_patterns = auth_patterns.len(),
            common_headers = common_headers.len(),
            "Traffic analysis complete"
        );

        AnalysisResult {
            endpoints,
            components,
            auth_patterns,
            common_headers,
            base_paths: collect_base_paths(records),
            metadata,
        }
    }
}

/// Analyze with a fresh [`TrafficAnalyzer`]
pub fn analyze(records: &[TrafficRecord]) -> AnalysisResult {
    TrafficAnalyzer::new().analyze(records)
}

/// Suffix colliding operation ids with `_2`, `_3`, ... in endpoint order
fn dedupe_operation_ids(endpoints: &mut [Endpoint]) {
    let mut taken: HashSet<String> = HashSet::new();

    for endpoint in endpoints.iter_mut() {
        if taken.insert(endpoint.operation_id.clone()) {
            continue;
        }
        let mut n = 2;
        let unique = loop {
            let candidate = format!("{}_{}", endpoint.operation_id, n);
            if !taken.contains(&candidate) {
                break candidate;
            }
            n += 1;
        };
        taken.insert(unique.clone());
        endpoint.operation_id = unique;
    }
}

/// Object-shaped request and success response schemas, keyed by component name
fn build_components(endpoints: &[Endpoint]) -> BTreeMap<String, SchemaNode> {
    let mut components = BTreeMap::new();

    for endpoint in endpoints {
        let base = pascal_case(&endpoint.operation_id);

        if let Some(body) = endpoint.request_body.as_ref() {
            if body.schema.is_structured_object() {
                insert_component(&mut components, format!("{}Request", base), &body.schema);
            }
        }

        let success = endpoint
            .responses
            .range(200..300)
            .filter_map(|(_, slot)| slot.schema.as_ref())
            .find(|schema| schema.is_structured_object());
        if let Some(schema) = success {
            insert_component(&mut components, format!("{}Response", base), schema);
        }
    }

    components
}

/// Distinct operation ids can share a PascalCase form (`get_users2`, `get_users_2`);
/// later names get a numeric suffix instead of replacing the earlier schema.
fn insert_component(
    components: &mut BTreeMap<String, SchemaNode>,
    name: String,
    schema: &SchemaNode,
) {
    let mut unique = name.clone();
    let mut n = 2;
    while components.contains_key(&unique) {
        unique = format!("{}{}", name, n);
        n += 1;
    }
    components.insert(unique, schema.clone());
}

/// Distinct request origins in first-seen order
fn collect_base_paths(records: &[TrafficRecord]) -> Vec<String> {
    let mut base_paths: Vec<String> = Vec::new();
    for record in records.iter().filter(|r| r.is_request()) {
        let Some(origin) = record.url.as_deref().and_then(|url| split_url(url).origin) else {
            continue;
        };
        if !base_paths.contains(&origin) {
            base_paths.push(origin);
        }
    }
    base_paths
}

fn collect_protocols(records: &[TrafficRecord]) -> Vec<String> {
    let mut protocols: Vec<String> = Vec::new();
    for protocol in records.iter().filter_map(|r| r.protocol.as_deref()) {
        if !protocols.iter().any(|seen| seen == protocol) {
            protocols.push(protocol.to_string());
        }
    }
    protocols
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tracing_test::traced_test;

    fn users_traffic() -> Vec<TrafficRecord> {
        vec![
            TrafficRecord::request("1", "GET", "https://api.example.com/users/1")
                .with_protocol("HTTP/1.1"),
            TrafficRecord::response("1", 200).with_body(json!({"id": 1, "name": "A"})),
            TrafficRecord::request("2", "GET", "https://api.example.com/users/2")
                .with_protocol("HTTP/2"),
            TrafficRecord::response("2", 200)
                .with_body(json!({"id": 2, "name": "B", "email": "b@x.com"})),
            TrafficRecord::request("3", "POST", "https://api.example.com/users")
                .with_body(json!({"name": "C"})),
            TrafficRecord::response("3", 201).with_body(json!({"id": 3, "name": "C"})),
            TrafficRecord::request("4", "GET", "http://localhost:8080/users").with_protocol("HTTP/1.1"),
        ]
    }

    #[test]
    fn test_analyze_counts_and_metadata() {
        let result = TrafficAnalyzer::new().analyze(&users_traffic());

        assert_eq!(result.endpoints.len(), 3);
        assert_eq!(result.metadata.total_records, 7);
        assert_eq!(result.metadata.request_count, 4);
        assert_eq!(result.metadata.response_count, 3);
        assert_eq!(result.metadata.pair_count, 4);
        assert_eq!(result.metadata.endpoint_count, 3);
        assert_eq!(result.metadata.protocols, vec!["HTTP/1.1", "HTTP/2"]);
        assert_eq!(
            result.base_paths,
            vec!["https://api.example.com", "http://localhost:8080"]
        );
    }

    #[test]
    fn test_operation_ids_are_unique() {
        let result = analyze(&users_traffic());
        let ids: Vec<_> = result.endpoints.iter().map(|e| e.operation_id.as_str()).collect();
        assert_eq!(ids, vec!["get_users", "post_users", "get_users_2"]);
    }

    #[test]
    fn test_components_registered() {
        let result = analyze(&users_traffic());
        let names: Vec<_> = result.components.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["GetUsersResponse", "PostUsersRequest", "PostUsersResponse"]);
        assert!(result.components["GetUsersResponse"].property("email").is_some());
    }

    #[test]
    fn test_dedupe_skips_taken_suffix() {
        let mut endpoints = analyze(&[
            TrafficRecord::request("1", "GET", "/users"),
            TrafficRecord::request("2", "GET", "/users/7"),
            TrafficRecord::request("3", "GET", "/users/7/orders"),
        ])
        .endpoints;
        endpoints[2].operation_id = "get_users".to_string();
        endpoints[0].operation_id = "get_users".to_string();
        endpoints[1].operation_id = "get_users_2".to_string();

        dedupe_operation_ids(&mut endpoints);
        let ids: Vec<_> = endpoints.iter().map(|e| e.operation_id.as_str()).collect();
        assert_eq!(ids, vec!["get_users", "get_users_2", "get_users_3"]);
    }

    #[test]
    fn test_component_names_never_overwrite() {
        let result = analyze(&[
            TrafficRecord::request("1", "POST", "/users2").with_body(json!({"a": 1})),
            TrafficRecord::request("2", "POST", "/users").with_body(json!({"b": 1})),
            TrafficRecord::request("3", "POST", "/users/7").with_body(json!({"c": 1})),
        ]);
        let ids: Vec<_> = result.endpoints.iter().map(|e| e.operation_id.as_str()).collect();
        assert_eq!(ids, vec!["post_users2", "post_users", "post_users_2"]);

        assert_eq!(result.components.len(), 3);
        assert!(result.components["PostUsers2Request"].property("a").is_some());
        assert!(result.components["PostUsersRequest"].property("b").is_some());
        assert!(result.components["PostUsers2Request2"].property("c").is_some());
    }

    #[test]
    fn test_base_paths_for_non_http_protocols() {
        let result = analyze(&[
            TrafficRecord::request("1", "PUBLISH", "mqtt://broker.example.com:1883/devices/42")
                .with_protocol("mqtt"),
            TrafficRecord::request("2", "POST", "grpc://api.example.com/users.UserService/GetUser")
                .with_protocol("grpc"),
        ]);
        assert_eq!(
            result.base_paths,
            vec!["mqtt://broker.example.com:1883", "grpc://api.example.com"]
        );
        assert_eq!(result.endpoints[0].path, "/devices/{id}");
    }

    #[test]
    fn test_empty_input() {
        let result = analyze(&[]);
        assert!(result.is_empty());
        assert!(result.components.is_empty());
        assert!(result.auth_patterns.is_empty());
        assert!(result.common_headers.is_empty());
        assert!(result.base_paths.is_empty());
        assert_eq!(result.metadata.total_records, 0);
    }

    #[test]
    fn test_responses_only() {
        let result = analyze(&[TrafficRecord::response("x", 200).with_body(json!({"ok": true}))]);
        assert!(result.is_empty());
        assert_eq!(result.metadata.pair_count, 1);
    }

    #[test]
    fn test_runs_are_independent() {
        let analyzer = TrafficAnalyzer::new();
        let first = analyzer.analyze(&users_traffic());
        let second = analyzer.analyze(&users_traffic());
        assert_ne!(first.metadata.run_id, second.metadata.run_id);
        assert_eq!(first.endpoints, second.endpoints);
    }

    #[traced_test]
    #[test]
    fn test_logs_completion() {
        analyze(&users_traffic());
        assert!(logs_contain("Traffic analysis complete"));
    }
}
