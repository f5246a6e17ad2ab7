//! # Observability Infrastructure
//!
//! Structured logging for apiscope. The analysis engine logs through
//! `tracing`; binaries decide where those events go.

pub mod logging;

pub use logging::{init_logging, log_config_info};
