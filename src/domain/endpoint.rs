//! Inferred endpoint model
//!
//! An [`Endpoint`] is keyed by `(method, normalized path)` and only ever
//! grows as samples are folded into it. Its path parameters are fixed when it
//! is created.

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

use crate::schema::SchemaNode;

/// Maximum number of distinct examples kept per body slot
pub const MAX_EXAMPLES: usize = 3;

/// Where a parameter is carried
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Path,
    Query,
    Header,
}

/// A path, query or header parameter
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "in")]
    pub location: ParameterLocation,
    pub required: bool,
    pub schema: SchemaNode,
}

impl Parameter {
    /// Path parameter typed from its placeholder name: `id` and `*Id` are integers
    pub fn path(name: &str) -> Self {
        let schema = if name == "id" || name.ends_with("Id") {
            SchemaNode::integer()
        } else {
            SchemaNode::string(None)
        };
        Self { name: name.to_string(), location: ParameterLocation::Path, required: true, schema }
    }

    pub fn query(name: &str, schema: SchemaNode) -> Self {
        Self { name: name.to_string(), location: ParameterLocation::Query, required: false, schema }
    }

    pub fn header(name: &str, schema: SchemaNode) -> Self {
        Self { name: name.to_string(), location: ParameterLocation::Header, required: false, schema }
    }
}

/// Evolving request body schema plus a bounded example list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestBody {
    pub schema: SchemaNode,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<Value>,
}

impl RequestBody {
    pub fn new(schema: SchemaNode, example: Value) -> Self {
        let mut body = Self { schema, examples: Vec::new() };
        push_example(&mut body.examples, example);
        body
    }

    /// Widen the schema with another sample and remember its body
    pub fn observe(&mut self, schema: &SchemaNode, example: Value) {
        self.schema = self.schema.unify(schema);
        push_example(&mut self.examples, example);
    }
}

/// Response slot for one status code
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseSlot {
    pub description: String,
    /// Absent until a response with a body is observed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<SchemaNode>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<Value>,
}

impl ResponseSlot {
    pub fn new<S: Into<String>>(description: S) -> Self {
        Self { description: description.into(), schema: None, examples: Vec::new() }
    }

    pub fn observe(&mut self, schema: &SchemaNode, example: Value) {
        self.schema = Some(match &self.schema {
            Some(existing) => existing.unify(schema),
            None => schema.clone(),
        });
        push_example(&mut self.examples, example);
    }
}

/// Append an example unless the list is full or already holds an equal value
fn push_example(examples: &mut Vec<Value>, example: Value) {
    if examples.len() < MAX_EXAMPLES && !examples.contains(&example) {
        examples.push(example);
    }
}

/// One logical API operation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    pub method: String,
    pub path: String,
    pub operation_id: String,
    pub summary: String,
    pub tags: Vec<String>,
    pub path_parameters: Vec<Parameter>,
    pub query_parameters: Vec<Parameter>,
    pub headers: Vec<Parameter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_body: Option<RequestBody>,
    pub responses: BTreeMap<u16, ResponseSlot>,
    /// Number of transactions folded into this endpoint
    pub sample_count: u64,
}

impl Endpoint {
    /// Aggregation key
    pub fn key(&self) -> (&str, &str) {
        (&self.method, &self.path)
    }

    pub fn query_parameter(&self, name: &str) -> Option<&Parameter> {
        self.query_parameters.iter().find(|p| p.name == name)
    }

    /// Header parameter, looked up case-insensitively
    pub fn header(&self, name: &str) -> Option<&Parameter> {
        self.headers.iter().find(|p| p.name.eq_ignore_ascii_case(name))
    }

    pub fn response(&self, status: u16) -> Option<&ResponseSlot> {
        self.responses.get(&status)
    }
}
