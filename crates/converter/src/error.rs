//! Error types for conversion operations

/// Conversion error types
///
/// Every variant is fatal for a run. Recoverable conditions (such as a
/// method without an operation identifier) are reported as warnings in the
/// [`ConversionReport`](crate::ConversionReport) instead.
#[derive(thiserror::Error, Debug)]
pub enum ConvertError {
    #[error("Environment {name} not found in {kind} profiles (available: {})", .available.join(", "))]
    UnknownProfile {
        kind: String,
        name: String,
        available: Vec<String>,
    },

    #[error("Invalid or missing fields for environment {profile}: {}", .fields.join(", "))]
    InvalidProfile { profile: String, fields: Vec<String> },

    #[error("No paths defined in {0}")]
    EmptySource(String),

    #[error("No {kind}-compatible paths found in {origin}")]
    NoMatchingPaths { kind: String, origin: String },

    #[error("Failed to parse source document {origin}: {message}")]
    SourceParse { origin: String, message: String },

    #[error("Failed to render document: {0}")]
    Render(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for conversion operations
pub type ConvertResult<T> = Result<T, ConvertError>;
