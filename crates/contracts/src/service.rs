//! ServiceDispatcher trait - host service call interface
//!
//! Abstracts the runtime that actually delivers a notification.

use crate::{ContractError, Payload};

/// Host service dispatcher
///
/// Every concrete notify backend implements this trait.
#[trait_variant::make(ServiceDispatcher: Send)]
pub trait LocalServiceDispatcher {
    /// Call `domain.service` with the given payload
    ///
    /// # Errors
    /// Returns the backend failure; callers decide whether it is fatal
    async fn call(&self, domain: &str, service: &str, payload: Payload)
        -> Result<(), ContractError>;
}
