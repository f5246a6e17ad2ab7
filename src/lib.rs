//! # apiscope
//!
//! Infers a structural API model from previously captured traffic: the
//! distinct endpoints, their path/query/header parameters, request and
//! response body schemas, and the authentication conventions in use.
//!
//! ## Architecture
//!
//! ```text
//! TrafficRecords → Pairer → Endpoint Aggregator → AnalysisResult
//!                              ↓          ↓
//!                      Path Normalizer  Schema Inference / Unifier
//! ```
//!
//! The analysis core is a pure, synchronous transformation that never fails.
//! Configuration, logging setup and file handling live at the edges
//! (`config`, `observability`, `cli`).
//!
//! ## Example Usage
//!
//! ```rust
//! use apiscope::{TrafficAnalyzer, TrafficRecord};
//! use serde_json::json;
//!
//! let records = vec![
//!     TrafficRecord::request("1", "GET", "/users/1"),
//!     TrafficRecord::response("1", 200).with_body(json!({"id": 1, "name": "A"})),
//! ];
//!
//! let result = TrafficAnalyzer::new().analyze(&records);
//! assert_eq!(result.endpoints[0].path, "/users/{id}");
//! ```

pub mod cli;
pub mod config;
pub mod domain;
pub mod errors;
pub mod observability;
pub mod schema;
pub mod services;
pub mod utils;

// Re-export commonly used types
pub use config::ObservabilityConfig;
pub use domain::{AnalysisResult, Endpoint, TrafficRecord};
pub use errors::{Error, Result};
pub use schema::SchemaNode;
pub use services::{analyze, TrafficAnalyzer};

/// Application version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name from Cargo.toml
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
