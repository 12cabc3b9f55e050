//! Dispatcher error types

use thiserror::Error;

/// Failure of a single downstream send
///
/// Never returned from `send_message`; collected into the `DispatchReport`.
#[derive(Debug, Error)]
pub enum DispatcherError {
    /// The service call returned an error
    #[error("send to '{service}' failed: {source}")]
    Send {
        service: String,
        #[source]
        source: contracts::ContractError,
    },

    /// The send task panicked or was aborted
    #[error("send task for '{service}' did not complete: {message}")]
    TaskFailed { service: String, message: String },
}

impl DispatcherError {
    /// Create a send error
    pub fn send(service: impl Into<String>, source: contracts::ContractError) -> Self {
        Self::Send {
            service: service.into(),
            source,
        }
    }

    /// Create a task failure error
    pub fn task_failed(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::TaskFailed {
            service: service.into(),
            message: message.into(),
        }
    }

    /// Service the failed send was addressed to
    pub fn service(&self) -> &str {
        match self {
            Self::Send { service, .. } | Self::TaskFailed { service, .. } => service,
        }
    }
}
