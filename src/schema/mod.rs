//! Schema inference module for automatic API schema discovery
//!
//! This module infers lightweight, JSON-Schema-like shapes from observed
//! payloads and widens them as more samples of the same slot arrive.

pub mod inference;
pub mod json_schema;
pub mod unify;

pub use inference::{
    decode_body, SchemaInferenceEngine, SchemaKind, SchemaNode, StringFormat, ARRAY_SAMPLE_LIMIT,
};
pub use unify::unify;
