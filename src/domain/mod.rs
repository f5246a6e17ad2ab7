//! Domain layer
//!
//! Pure data model for the traffic analysis engine with zero infrastructure
//! dependencies: the captured records going in, and the inferred API model
//! coming out.
//!
//! ## Module Organization
//!
//! - `traffic`: captured records, headers and request/response pairs
//! - `endpoint`: endpoints, parameters and body slots
//! - `analysis`: the aggregate analysis result and detector facets

pub mod analysis;
pub mod endpoint;
pub mod traffic;

pub use analysis::{AnalysisMetadata, AnalysisResult, AuthPattern, AuthScheme, CommonHeader};
pub use endpoint::{
    Endpoint, Parameter, ParameterLocation, RequestBody, ResponseSlot, MAX_EXAMPLES,
};
pub use traffic::{Direction, Headers, TrafficRecord, TransactionPair};
