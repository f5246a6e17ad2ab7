//! JSON Schema rendering
//!
//! Schema nodes serialize directly as standard JSON Schema objects (`type`,
//! `format`, `properties`, `required`, `items`, `example`), which is the shape
//! OpenAPI and AsyncAPI emitters consume.

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use super::inference::{SchemaKind, SchemaNode};

impl SchemaNode {
    /// Convert to a JSON Schema object
    pub fn to_json_schema(&self) -> Value {
        let mut schema = Map::new();
        schema.insert("type".to_string(), Value::String(self.type_name().to_string()));

        match &self.kind {
            SchemaKind::String { format: Some(format) } => {
                schema.insert("format".to_string(), Value::String(format.as_str().to_string()));
            }
            SchemaKind::Array { items } => {
                schema.insert("items".to_string(), items.to_json_schema());
            }
            SchemaKind::Object { properties, required } => {
                if !properties.is_empty() {
                    let props = properties
                        .iter()
                        .map(|(name, node)| (name.clone(), node.to_json_schema()))
                        .collect();
                    schema.insert("properties".to_string(), Value::Object(props));
                }
                if !required.is_empty() {
                    let required = required.iter().cloned().map(Value::String).collect();
                    schema.insert("required".to_string(), Value::Array(required));
                }
            }
            _ => {}
        }

        if let Some(example) = &self.example {
            schema.insert("example".to_string(), example.clone());
        }

        Value::Object(schema)
    }
}

impl Serialize for SchemaNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json_schema().serialize(serializer)
    }
}
