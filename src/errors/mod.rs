//! # Error Handling
//!
//! Error handling for apiscope. The analysis engine itself is infallible;
//! these types cover configuration, input loading and output rendering.

pub mod types;

pub use types::{ApiscopeError, Result};

/// Short alias used across the crate
pub type Error = ApiscopeError;
