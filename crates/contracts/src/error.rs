//! Layered error definitions
//!
//! Categorized by source: config / condition / service

use thiserror::Error;

/// Unified error type
#[derive(Debug, Error)]
pub enum ContractError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== Service Errors =====
    /// Downstream notify service rejected or failed the call
    #[error("service '{domain}.{service}' call failed: {message}")]
    ServiceCall {
        domain: String,
        service: String,
        message: String,
    },
}

impl ContractError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create service call error
    pub fn service_call(
        domain: impl Into<String>,
        service: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::ServiceCall {
            domain: domain.into(),
            service: service.into(),
            message: message.into(),
        }
    }
}

/// Structured failure raised while evaluating a compiled condition.
///
/// Evaluation errors never abort a dispatch; they are aggregated and logged.
#[derive(Debug, Error)]
pub enum ConditionError {
    /// The condition referenced a context path that does not resolve
    #[error("unknown reference '{path}'")]
    UnknownReference { path: String },

    /// The value at `path` has the wrong shape for the condition
    #[error("invalid value at '{path}': {message}")]
    InvalidValue { path: String, message: String },

    /// Error of one condition inside an ordered list
    #[error("In '{}' (item {} of {}): {}", .kind, .index + 1, .total, .source)]
    Indexed {
        kind: String,
        index: usize,
        total: usize,
        source: Box<ConditionError>,
    },

    /// Aggregate of several condition errors
    #[error("{}", render_container(.kind, .errors))]
    Container {
        kind: String,
        errors: Vec<ConditionError>,
    },
}

impl ConditionError {
    /// Create unknown reference error
    pub fn unknown_reference(path: impl Into<String>) -> Self {
        Self::UnknownReference { path: path.into() }
    }

    /// Create invalid value error
    pub fn invalid_value(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Wrap an error with its position in a condition list
    pub fn indexed(kind: impl Into<String>, index: usize, total: usize, source: Self) -> Self {
        Self::Indexed {
            kind: kind.into(),
            index,
            total,
            source: Box::new(source),
        }
    }

    /// Aggregate several errors
    pub fn container(kind: impl Into<String>, errors: Vec<Self>) -> Self {
        Self::Container {
            kind: kind.into(),
            errors,
        }
    }
}

fn render_container(kind: &str, errors: &[ConditionError]) -> String {
    let mut out = format!("In '{kind}':");
    for error in errors {
        out.push_str("\n  ");
        out.push_str(&error.to_string());
    }
    out
}
