//! Schema unification (widening)
//!
//! Merges two observations of the same logical slot into one schema that
//! accepts both. The operation is commutative and associative, so the order
//! in which samples are folded never changes the final shape.

use serde_json::Value;
use std::collections::BTreeMap;

use super::inference::{SchemaKind, SchemaNode};

/// Unify two schema nodes.
///
/// - Different kinds degrade to the generic [`SchemaKind::Mixed`] fallback.
/// - Objects take the union of fields and the intersection of required sets.
/// - Arrays unify their item schemas.
/// - String formats survive only when both sides agree.
pub fn unify(a: &SchemaNode, b: &SchemaNode) -> SchemaNode {
    let kind = match (&a.kind, &b.kind) {
        (SchemaKind::Mixed, _) | (_, SchemaKind::Mixed) => return SchemaNode::mixed(),

        (SchemaKind::Null, SchemaKind::Null) => SchemaKind::Null,
        (SchemaKind::Boolean, SchemaKind::Boolean) => SchemaKind::Boolean,
        (SchemaKind::Integer, SchemaKind::Integer) => SchemaKind::Integer,
        (SchemaKind::Number, SchemaKind::Number) => SchemaKind::Number,

        (SchemaKind::String { format: left }, SchemaKind::String { format: right }) => {
            SchemaKind::String { format: if left == right { *left } else { None } }
        }

        (SchemaKind::Array { items: left }, SchemaKind::Array { items: right }) => {
            SchemaKind::Array { items: Box::new(unify(left, right)) }
        }

        (
            SchemaKind::Object { properties: left_props, required: left_req },
            SchemaKind::Object { properties: right_props, required: right_req },
        ) => {
            let mut properties: BTreeMap<String, SchemaNode> = left_props.clone();
            for (name, right) in right_props {
                properties
                    .entry(name.clone())
                    .and_modify(|left| *left = unify(left, right))
                    .or_insert_with(|| right.clone());
            }
            let required = left_req.intersection(right_req).cloned().collect();
            SchemaKind::Object { properties, required }
        }

        _ => return SchemaNode::mixed(),
    };

    SchemaNode { kind, example: pick_example(a.example.as_ref(), b.example.as_ref()) }
}

/// Choose between two example candidates independently of argument order:
/// the one with the smaller canonical JSON text wins.
fn pick_example(a: Option<&Value>, b: Option<&Value>) -> Option<Value> {
    match (a, b) {
        (Some(a), Some(b)) => {
            if a.to_string() <= b.to_string() {
                Some(a.clone())
            } else {
                Some(b.clone())
            }
        }
        (Some(only), None) | (None, Some(only)) => Some(only.clone()),
        (None, None) => None,
    }
}

impl SchemaNode {
    /// Widen this schema with another observation
    pub fn unify(&self, other: &SchemaNode) -> SchemaNode {
        unify(self, other)
    }
}
