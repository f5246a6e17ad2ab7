//! # Error Types
//!
//! Error types for the edges of the apiscope crate using `thiserror`.
//!
//! The analysis core never fails; these errors only surface while loading
//! configuration, reading captured traffic and serialising results.

/// Custom result type for apiscope operations
pub type Result<T> = std::result::Result<T, ApiscopeError>;

/// Main error type for apiscope
#[derive(thiserror::Error, Debug)]
pub enum ApiscopeError {
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// I/O errors with additional context
    #[error("I/O error: {context}")]
    Io {
        #[source]
        source: std::io::Error,
        context: String,
    },

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {context}")]
    Serialization {
        #[source]
        source: serde_json::Error,
        context: String,
    },

    /// YAML serialization errors
    #[error("YAML error: {context}")]
    Yaml {
        #[source]
        source: serde_yaml::Error,
        context: String,
    },

    /// Validation errors
    #[error("Validation error: {message}")]
    Validation { message: String, field: Option<String> },

    /// Malformed traffic input (record files)
    #[error("Invalid traffic input{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    Input { message: String, line: Option<usize> },
}

impl ApiscopeError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config { message: message.into(), source: None }
    }

    /// Create a configuration error with source
    pub fn config_with_source<S: Into<String>>(
        message: S,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        Self::Config { message: message.into(), source: Some(source) }
    }

    /// Create a validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation { message: message.into(), field: None }
    }

    /// Create a validation error with field information
    pub fn validation_field<S: Into<String>, F: Into<String>>(message: S, field: F) -> Self {
        Self::Validation { message: message.into(), field: Some(field.into()) }
    }

    /// Create an input error
    pub fn input<S: Into<String>>(message: S) -> Self {
        Self::Input { message: message.into(), line: None }
    }

    /// Create an input error pinned to a 1-based line number
    pub fn input_at_line<S: Into<String>>(message: S, line: usize) -> Self {
        Self::Input { message: message.into(), line: Some(line) }
    }

    /// Prefix the error's context with additional detail
    pub fn with_context<S: Into<String>>(mut self, context: S) -> Self {
        let context = context.into();
        match self {
            ApiscopeError::Io { context: ref mut ctx, .. }
            | ApiscopeError::Serialization { context: ref mut ctx, .. }
            | ApiscopeError::Yaml { context: ref mut ctx, .. } => {
                *ctx = format!("{}: {}", context, ctx);
            }
            ApiscopeError::Config { ref mut message, .. }
            | ApiscopeError::Validation { ref mut message, .. }
            | ApiscopeError::Input { ref mut message, .. } => {
                *message = format!("{}: {}", context, message);
            }
        }
        self
    }
}

impl From<std::io::Error> for ApiscopeError {
    fn from(error: std::io::Error) -> Self {
        Self::Io { source: error, context: "I/O operation failed".to_string() }
    }
}

impl From<serde_json::Error> for ApiscopeError {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization { source: error, context: "JSON serialization failed".to_string() }
    }
}

impl From<serde_yaml::Error> for ApiscopeError {
    fn from(error: serde_yaml::Error) -> Self {
        Self::Yaml { source: error, context: "YAML serialization failed".to_string() }
    }
}

impl From<validator::ValidationErrors> for ApiscopeError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<String> = errors
            .field_errors()
            .iter()
            .map(|(field, field_errors)| {
                let error_messages: Vec<String> = field_errors
                    .iter()
                    .map(|e| {
                        e.message.as_ref().map_or("Invalid value".to_string(), |m| m.to_string())
                    })
                    .collect();
                format!("{}: {}", field, error_messages.join(", "))
            })
            .collect();
        fields.sort();

        Self::validation(format!("Validation failed: {}", fields.join("; ")))
    }
}
