//! Analysis services
//!
//! Each stage of the traffic analysis pipeline lives in its own module;
//! [`TrafficAnalyzer`] runs them in order.

pub mod analyzer;
pub mod auth_detector;
pub mod endpoint_aggregator;
pub mod header_detector;
pub mod metadata;
pub mod path_normalizer;
pub mod transaction_pairer;

pub use analyzer::{analyze, TrafficAnalyzer};
pub use auth_detector::detect_auth_patterns;
pub use endpoint_aggregator::EndpointAggregator;
pub use header_detector::{
    detect_common_headers, COMMON_HEADER_THRESHOLD, REQUIRED_HEADER_THRESHOLD,
};
pub use metadata::EndpointMetadata;
pub use path_normalizer::{normalize_path, split_url, NormalizedPath, UrlParts};
pub use transaction_pairer::pair_transactions;
