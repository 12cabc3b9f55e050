//! MemoryDispatcher - records service calls in memory

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use contracts::{ContractError, Payload, ServiceDispatcher};
use tracing::debug;

/// One recorded service call
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceCall {
    pub domain: String,
    pub service: String,
    pub payload: Payload,
}

/// Dispatcher that records every call, optionally failing chosen services
#[derive(Debug, Default)]
pub struct MemoryDispatcher {
    calls: Mutex<Vec<ServiceCall>>,
    failing: HashSet<String>,
    delay: Option<Duration>,
}

impl MemoryDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: make calls to `service` fail
    pub fn with_failing(mut self, service: impl Into<String>) -> Self {
        self.failing.insert(service.into());
        self
    }

    /// Builder: delay every call before recording it
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// All successful calls so far, in completion order
    pub fn calls(&self) -> Vec<ServiceCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Successful calls addressed to `service`
    pub fn calls_to(&self, service: &str) -> Vec<ServiceCall> {
        self.calls()
            .into_iter()
            .filter(|call| call.service == service)
            .collect()
    }
}

impl ServiceDispatcher for MemoryDispatcher {
    async fn call(
        &self,
        domain: &str,
        service: &str,
        payload: Payload,
    ) -> Result<(), ContractError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing.contains(service) {
            return Err(ContractError::service_call(domain, service, "mock failure"));
        }

        debug!(domain, service, "Recording service call");
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(ServiceCall {
                domain: domain.to_string(),
                service: service.to_string(),
                payload,
            });
        Ok(())
    }
}
