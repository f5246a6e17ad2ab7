//! Schema inference engine for JSON payloads
//!
//! This module classifies decoded JSON values into [`SchemaNode`] trees.
//! Leaves keep the value they were inferred from as an example candidate;
//! containers only keep structure.

use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

use crate::utils;

/// Maximum number of array elements sampled when inferring an item schema
/// (the first element plus the next four).
pub const ARRAY_SAMPLE_LIMIT: usize = 5;

/// Detected format for string values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StringFormat {
    Email,
    DateTime,
    Date,
    Uri,
    Uuid,
}

impl StringFormat {
    /// JSON Schema `format` keyword value
    pub fn as_str(&self) -> &'static str {
        match self {
            StringFormat::Email => "email",
            StringFormat::DateTime => "date-time",
            StringFormat::Date => "date",
            StringFormat::Uri => "uri",
            StringFormat::Uuid => "uuid",
        }
    }

    /// Detect the format of a string value.
    ///
    /// Checks run in priority order and the first match wins: email,
    /// date-time, date, `http(s)://` URI, UUID.
    pub fn detect(value: &str) -> Option<StringFormat> {
        if utils::is_email(value) {
            Some(StringFormat::Email)
        } else if utils::is_date_time(value) {
            Some(StringFormat::DateTime)
        } else if utils::is_date(value) {
            Some(StringFormat::Date)
        } else if utils::is_http_uri(value) {
            Some(StringFormat::Uri)
        } else if utils::is_uuid(value) {
            Some(StringFormat::Uuid)
        } else {
            None
        }
    }
}

/// Structural kind of a schema node
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaKind {
    Null,
    Boolean,
    Integer,
    Number,
    String {
        format: Option<StringFormat>,
    },
    /// Array with a single unified item schema
    Array {
        items: Box<SchemaNode>,
    },
    /// Object with its fields and the fields present (non-null) in every sample
    Object {
        properties: BTreeMap<String, SchemaNode>,
        required: BTreeSet<String>,
    },
    /// Fallback produced when observations of different kinds are unified.
    /// Renders as a generic object and absorbs anything unified into it.
    Mixed,
}

/// Inferred schema for one value slot
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaNode {
    pub kind: SchemaKind,
    /// Example candidate (leaves only)
    pub example: Option<Value>,
}

impl SchemaNode {
    fn of(kind: SchemaKind) -> Self {
        Self { kind, example: None }
    }

    pub fn null() -> Self {
        Self::of(SchemaKind::Null)
    }

    pub fn boolean() -> Self {
        Self::of(SchemaKind::Boolean)
    }

    pub fn integer() -> Self {
        Self::of(SchemaKind::Integer)
    }

    pub fn number() -> Self {
        Self::of(SchemaKind::Number)
    }

    pub fn string(format: Option<StringFormat>) -> Self {
        Self::of(SchemaKind::String { format })
    }

    pub fn array(items: SchemaNode) -> Self {
        Self::of(SchemaKind::Array { items: Box::new(items) })
    }

    pub fn object<I, R>(properties: I, required: R) -> Self
    where
        I: IntoIterator<Item = (String, SchemaNode)>,
        R: IntoIterator<Item = String>,
    {
        Self::of(SchemaKind::Object {
            properties: properties.into_iter().collect(),
            required: required.into_iter().collect(),
        })
    }

    /// Object with no fields
    pub fn empty_object() -> Self {
        Self::object(Vec::new(), Vec::new())
    }

    /// Generic fallback for irreconcilable observations
    pub fn mixed() -> Self {
        Self::of(SchemaKind::Mixed)
    }

    /// Attach an example value
    pub fn with_example(mut self, example: Value) -> Self {
        self.example = Some(example);
        self
    }

    /// JSON Schema `type` keyword for this node
    pub fn type_name(&self) -> &'static str {
        match self.kind {
            SchemaKind::Null => "null",
            SchemaKind::Boolean => "boolean",
            SchemaKind::Integer => "integer",
            SchemaKind::Number => "number",
            SchemaKind::String { .. } => "string",
            SchemaKind::Array { .. } => "array",
            SchemaKind::Object { .. } | SchemaKind::Mixed => "object",
        }
    }

    pub fn format(&self) -> Option<StringFormat> {
        match self.kind {
            SchemaKind::String { format } => format,
            _ => None,
        }
    }

    pub fn items(&self) -> Option<&SchemaNode> {
        match &self.kind {
            SchemaKind::Array { items } => Some(items),
            _ => None,
        }
    }

    pub fn properties(&self) -> Option<&BTreeMap<String, SchemaNode>> {
        match &self.kind {
            SchemaKind::Object { properties, .. } => Some(properties),
            _ => None,
        }
    }

    pub fn property(&self, name: &str) -> Option<&SchemaNode> {
        self.properties().and_then(|props| props.get(name))
    }

    pub fn required(&self) -> Option<&BTreeSet<String>> {
        match &self.kind {
            SchemaKind::Object { required, .. } => Some(required),
            _ => None,
        }
    }

    /// True for objects that carry at least one field
    pub fn is_structured_object(&self) -> bool {
        self.properties().is_some_and(|props| !props.is_empty())
    }
}

/// Schema inference engine
///
/// Stateless; construct one wherever inference is needed.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaInferenceEngine;

impl SchemaInferenceEngine {
    pub fn new() -> Self {
        Self
    }

    /// Infer a schema from a decoded JSON value. Never fails.
    pub fn infer_from_value(&self, value: &Value) -> SchemaNode {
        match value {
            Value::Null => SchemaNode::null(),

            Value::Bool(_) => SchemaNode::boolean().with_example(value.clone()),

            Value::Number(n) => {
                let integral = n.is_i64()
                    || n.is_u64()
                    || n.as_f64().is_some_and(|f| f.is_finite() && f.fract() == 0.0);
                let node = if integral { SchemaNode::integer() } else { SchemaNode::number() };
                node.with_example(value.clone())
            }

            Value::String(s) => {
                SchemaNode::string(StringFormat::detect(s)).with_example(value.clone())
            }

            Value::Array(arr) => {
                let mut sampled = arr.iter().take(ARRAY_SAMPLE_LIMIT);
                let items = match sampled.next() {
                    // Empty arrays carry no evidence; use an open object placeholder
                    None => SchemaNode::empty_object(),
                    Some(first) => sampled.fold(self.infer_from_value(first), |acc, item| {
                        acc.unify(&self.infer_from_value(item))
                    }),
                };
                SchemaNode::array(items)
            }

            Value::Object(obj) => {
                let properties = obj.iter().map(|(key, val)| (key.clone(), self.infer_from_value(val)));
                let required =
                    obj.iter().filter(|(_, val)| !val.is_null()).map(|(key, _)| key.clone());
                SchemaNode::object(properties, required)
            }
        }
    }

    /// Infer a schema from a captured message body.
    ///
    /// Returns `None` when no body was observed.
    pub fn infer_from_body(&self, body: Option<&Value>) -> Option<(SchemaNode, Value)> {
        let decoded = decode_body(body)?;
        Some((self.infer_from_value(&decoded), decoded))
    }
}

/// Decode a captured body into a JSON value.
///
/// `null` and blank string bodies count as absent. String bodies holding JSON
/// text are parsed; anything else stays a plain string.
pub fn decode_body(body: Option<&Value>) -> Option<Value> {
    match body? {
        Value::Null => None,
        Value::String(raw) => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                return None;
            }
            Some(serde_json::from_str(trimmed).unwrap_or_else(|_| Value::String(raw.clone())))
        }
        other => Some(other.clone()),
    }
}
