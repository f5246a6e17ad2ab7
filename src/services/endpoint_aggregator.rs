//! Endpoint aggregation
//!
//! Folds transaction pairs into one accumulating [`Endpoint`] per
//! `(method, normalized path)` key. Every facet except the path parameters
//! only ever widens as samples arrive.
//!
//! ## Per-sample pipeline
//!
//! 1. Normalize the request URL and look up or create the endpoint
//! 2. Union query parameters (first sighting of a name wins)
//! 3. Union non-transport request headers
//! 4. Infer and unify the request body schema
//! 5. Infer and unify the response schema for the observed status

use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

use super::metadata::{status_description, EndpointMetadata};
use super::path_normalizer::{normalize_template, split_url, NormalizedPath};
use crate::domain::{
    Endpoint, Headers, Parameter, RequestBody, ResponseSlot, TrafficRecord, TransactionPair,
};
use crate::schema::{SchemaInferenceEngine, SchemaNode};

/// Transport-level request headers never reported as endpoint parameters
pub const IGNORED_HEADERS: &[&str] =
    &["host", "user-agent", "connection", "cache-control", "content-length", "content-type"];

/// True for headers excluded from endpoint header parameters
pub fn is_ignored_header(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    lower.starts_with("accept") || IGNORED_HEADERS.contains(&lower.as_str())
}

/// Infer a query parameter schema from its raw string value
pub fn infer_query_value(engine: &SchemaInferenceEngine, value: &str) -> SchemaNode {
    if let Ok(n) = value.parse::<i64>() {
        return SchemaNode::integer().with_example(Value::from(n));
    }
    if let Ok(f) = value.parse::<f64>() {
        if f.is_finite() {
            if let Some(n) = serde_json::Number::from_f64(f) {
                return SchemaNode::number().with_example(Value::Number(n));
            }
        }
    }
    match value {
        "true" | "false" => SchemaNode::boolean().with_example(Value::Bool(value == "true")),
        _ => engine.infer_from_value(&Value::String(value.to_string())),
    }
}

/// Accumulates endpoints across transaction pairs
#[derive(Debug, Default)]
pub struct EndpointAggregator {
    engine: SchemaInferenceEngine,
    endpoints: Vec<Endpoint>,
    index: HashMap<(String, String), usize>,
}

impl EndpointAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one transaction into its endpoint.
    ///
    /// Returns false when the pair has no request (the pair is dropped).
    pub fn observe(&mut self, pair: &TransactionPair<'_>) -> bool {
        let Some(request) = pair.request else {
            debug!(correlation_id = %pair.id, "Dropping response without a matching request");
            return false;
        };

        let method = request.method.as_deref().unwrap_or("GET").trim().to_ascii_uppercase();
        let url = split_url(request.url.as_deref().unwrap_or("/"));
        let normalized = normalize_template(&url.path);

        let engine = self.engine;
        let endpoint = self.endpoint_mut(method, normalized);
        endpoint.sample_count += 1;

        for (name, value) in &url.query {
            if endpoint.query_parameter(name).is_none() {
                let schema = infer_query_value(&engine, value);
                endpoint.query_parameters.push(Parameter::query(name, schema));
            }
        }

        record_headers(&engine, endpoint, &request.headers);

        if let Some((schema, body)) = engine.infer_from_body(request.body.as_ref()) {
            match endpoint.request_body.as_mut() {
                Some(existing) => existing.observe(&schema, body),
                None => endpoint.request_body = Some(RequestBody::new(schema, body)),
            }
        }

        if let Some(response) = pair.response {
            record_response(&engine, endpoint, response);
        }

        true
    }

    /// Number of distinct endpoints seen so far
    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    /// Endpoints in first-seen order
    pub fn into_endpoints(self) -> Vec<Endpoint> {
        self.endpoints
    }

    fn endpoint_mut(&mut self, method: String, normalized: NormalizedPath) -> &mut Endpoint {
        let key = (method, normalized.template);
        let slot = match self.index.get(&key).copied() {
            Some(slot) => slot,
            None => {
                let endpoint = create_endpoint(&key.0, &key.1, &normalized.parameters);
                debug!(method = %endpoint.method, path = %endpoint.path, "Discovered endpoint");
                self.endpoints.push(endpoint);
                self.index.insert(key, self.endpoints.len() - 1);
                self.endpoints.len() - 1
            }
        };
        &mut self.endpoints[slot]
    }
}

fn create_endpoint(method: &str, template: &str, placeholders: &[String]) -> Endpoint {
    let metadata = EndpointMetadata::derive(method, template);

    let mut path_parameters: Vec<Parameter> = Vec::new();
    for name in placeholders {
        if !path_parameters.iter().any(|p| &p.name == name) {
            path_parameters.push(Parameter::path(name));
        }
    }

    Endpoint {
        method: method.to_string(),
        path: template.to_string(),
        operation_id: metadata.operation_id,
        summary: metadata.summary,
        tags: vec![metadata.tag],
        path_parameters,
        query_parameters: Vec::new(),
        headers: Vec::new(),
        request_body: None,
        responses: Default::default(),
        sample_count: 0,
    }
}

fn record_headers(engine: &SchemaInferenceEngine, endpoint: &mut Endpoint, headers: &Headers) {
    for (name, value) in headers.iter() {
        if is_ignored_header(name) || endpoint.header(name).is_some() {
            continue;
        }
        let schema = engine.infer_from_value(&Value::String(value.to_string()));
        endpoint.headers.push(Parameter::header(name, schema));
    }
}

fn record_response(
    engine: &SchemaInferenceEngine,
    endpoint: &mut Endpoint,
    response: &TrafficRecord,
) {
    let Some(status) = response.status else {
        debug!(correlation_id = %response.id, "Dropping response without a status code");
        return;
    };

    let slot = endpoint.responses.entry(status).or_insert_with(|| {
        let description = response
            .status_text
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| status_description(status));
        ResponseSlot::new(description)
    });

    if let Some((schema, body)) = engine.infer_from_body(response.body.as_ref()) {
        slot.observe(&schema, body);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{SchemaKind, StringFormat};
    use serde_json::json;

    fn fold(records: &[TrafficRecord]) -> Vec<Endpoint> {
        let mut aggregator = EndpointAggregator::new();
        for pair in crate::services::transaction_pairer::pair_transactions(records) {
            aggregator.observe(&pair);
        }
        aggregator.into_endpoints()
    }

    #[test]
    fn test_concrete_paths_share_one_endpoint() {
        let endpoints = fold(&[
            TrafficRecord::request("1", "get", "/users/1"),
            TrafficRecord::request("2", "GET", "/users/2"),
            TrafficRecord::request("3", "DELETE", "/users/2"),
        ]);

        assert_eq!(endpoints.len(), 2);
        assert_eq!(endpoints[0].key(), ("GET", "/users/{id}"));
        assert_eq!(endpoints[0].sample_count, 2);
        assert_eq!(endpoints[1].key(), ("DELETE", "/users/{id}"));
    }

    #[test]
    fn test_endpoint_metadata_and_path_parameters() {
        let endpoints = fold(&[TrafficRecord::request("1", "GET", "/orders/42/items/7")]);
        let endpoint = &endpoints[0];

        assert_eq!(endpoint.path, "/orders/{id}/items/{id}");
        assert_eq!(endpoint.operation_id, "get_orders_items");
        assert_eq!(endpoint.summary, "Get items");
        assert_eq!(endpoint.tags, vec!["Orders"]);
        assert_eq!(endpoint.path_parameters.len(), 1);
        assert_eq!(endpoint.path_parameters[0].schema.kind, SchemaKind::Integer);
    }

    #[test]
    fn test_query_parameters_first_seen_wins() {
        let endpoints = fold(&[
            TrafficRecord::request("1", "GET", "/search?page=1&q=rust"),
            TrafficRecord::request("2", "GET", "/search?page=two&sort=asc"),
        ]);
        let endpoint = &endpoints[0];

        let names: Vec<_> = endpoint.query_parameters.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["page", "q", "sort"]);
        let page = endpoint.query_parameter("page").unwrap();
        assert_eq!(page.schema.kind, SchemaKind::Integer);
        assert_eq!(page.schema.example, Some(json!(1)));
        assert!(!page.required);
    }

    #[test]
    fn test_infer_query_value_types() {
        let engine = SchemaInferenceEngine::new();
        assert_eq!(infer_query_value(&engine, "12").kind, SchemaKind::Integer);
        assert_eq!(infer_query_value(&engine, "1.5").kind, SchemaKind::Number);
        assert_eq!(infer_query_value(&engine, "true").kind, SchemaKind::Boolean);
        assert_eq!(infer_query_value(&engine, "2024-01-31").format(), Some(StringFormat::Date));
        assert_eq!(infer_query_value(&engine, "NaN").type_name(), "string");
    }

    #[test]
    fn test_transport_headers_are_ignored() {
        let endpoints = fold(&[TrafficRecord::request("1", "GET", "/users")
            .with_header("Host", "api.example.com")
            .with_header("User-Agent", "curl/8")
            .with_header("Accept-Encoding", "gzip")
            .with_header("Content-Type", "application/json")
            .with_header("X-Tenant", "acme")]);
        let names: Vec<_> = endpoints[0].headers.iter().map(|h| h.name.as_str()).collect();
        assert_eq!(names, vec!["X-Tenant"]);
    }

    #[test]
    fn test_headers_unioned_case_insensitively() {
        let endpoints = fold(&[
            TrafficRecord::request("1", "GET", "/users").with_header("X-Tenant", "acme"),
            TrafficRecord::request("2", "GET", "/users")
                .with_header("x-tenant", "other")
                .with_header("X-Request-Id", "r-2"),
        ]);
        assert_eq!(endpoints[0].headers.len(), 2);
        assert_eq!(endpoints[0].header("x-tenant").unwrap().schema.example, Some(json!("acme")));
    }

    #[test]
    fn test_request_body_unified_with_bounded_examples() {
        let records: Vec<TrafficRecord> = (0..5)
            .map(|n| {
                TrafficRecord::request(n.to_string(), "POST", "/users")
                    .with_body(json!({"name": format!("user-{}", n % 4), "age": n}))
            })
            .collect();
        let endpoints = fold(&records);
        let body = endpoints[0].request_body.as_ref().unwrap();

        assert_eq!(body.schema.properties().unwrap().len(), 2);
        assert_eq!(body.examples.len(), crate::domain::MAX_EXAMPLES);
    }

    #[test]
    fn test_duplicate_examples_not_repeated() {
        let endpoints = fold(&[
            TrafficRecord::request("1", "POST", "/users").with_body(json!({"a": 1})),
            TrafficRecord::request("2", "POST", "/users").with_body(json!("{\"a\": 1}")),
        ]);
        assert_eq!(endpoints[0].request_body.as_ref().unwrap().examples, vec![json!({"a": 1})]);
    }

    #[test]
    fn test_response_slots_by_status() {
        let endpoints = fold(&[
            TrafficRecord::request("1", "GET", "/users/1"),
            TrafficRecord::response("1", 200).with_body(json!({"id": 1})),
            TrafficRecord::request("2", "GET", "/users/999"),
            TrafficRecord::response("2", 404).with_status_text("User Missing"),
            TrafficRecord::request("3", "GET", "/users/3"),
            TrafficRecord::response("3", 200).with_body(json!({"id": 3, "name": "C"})),
        ]);
        let endpoint = &endpoints[0];

        let ok = endpoint.response(200).unwrap();
        assert_eq!(ok.description, "OK");
        let schema = ok.schema.as_ref().unwrap();
        assert_eq!(schema.properties().unwrap().len(), 2);
        assert_eq!(schema.required().unwrap().iter().collect::<Vec<_>>(), vec!["id"]);
        assert_eq!(ok.examples.len(), 2);

        let missing = endpoint.response(404).unwrap();
        assert_eq!(missing.description, "User Missing");
        assert!(missing.schema.is_none());
    }

    #[test]
    fn test_orphan_response_dropped() {
        let mut aggregator = EndpointAggregator::new();
        let response = TrafficRecord::response("ghost", 200);
        let pair = TransactionPair { id: "ghost", request: None, response: Some(&response) };
        assert!(!aggregator.observe(&pair));
        assert!(aggregator.is_empty());
    }

    #[test]
    fn test_response_without_status_dropped() {
        let mut response = TrafficRecord::response("1", 200);
        response.status = None;
        let request = TrafficRecord::request("1", "GET", "/ping");
        let pair = TransactionPair { id: "1", request: Some(&request), response: Some(&response) };

        let mut aggregator = EndpointAggregator::new();
        assert!(aggregator.observe(&pair));
        assert!(aggregator.into_endpoints()[0].responses.is_empty());
    }
}
