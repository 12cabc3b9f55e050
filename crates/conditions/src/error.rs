//! Condition compile errors

use thiserror::Error;

/// Raised when a condition expression is structurally invalid
#[derive(Debug, Error)]
pub enum CompileError {
    /// Expression does not match any condition schema
    #[error("invalid condition schema: {message}")]
    Schema { message: String },

    /// Expression is neither a boolean nor a mapping
    #[error("expected a boolean or a mapping, got {found}")]
    UnsupportedType { found: String },

    /// Path is empty or has empty segments
    #[error("invalid path '{path}'")]
    InvalidPath { path: String },

    /// Numeric condition without `above` or `below`
    #[error("numeric condition on '{path}' needs 'above' or 'below'")]
    MissingBound { path: String },

    /// Regex pattern does not compile
    #[error("invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Group condition without sub-conditions
    #[error("'{kind}' condition needs at least one sub-condition")]
    EmptyGroup { kind: String },

    /// Error inside a condition list
    #[error("condition {index}: {source}")]
    Nested {
        index: usize,
        #[source]
        source: Box<CompileError>,
    },
}

impl CompileError {
    /// Create schema error
    pub fn schema(message: impl Into<String>) -> Self {
        Self::Schema {
            message: message.into(),
        }
    }

    /// Wrap an error with its index in a condition list
    pub fn nested(index: usize, source: Self) -> Self {
        Self::Nested {
            index,
            source: Box::new(source),
        }
    }
}
