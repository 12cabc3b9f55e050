//! LogDispatcher - logs every service call via tracing

use contracts::{ContractError, Payload, ServiceDispatcher};
use tracing::{info, instrument};

/// Dispatcher that only logs the calls it receives
#[derive(Debug, Clone, Default)]
pub struct LogDispatcher;

impl LogDispatcher {
    pub fn new() -> Self {
        Self
    }
}

impl ServiceDispatcher for LogDispatcher {
    #[instrument(name = "log_dispatcher_call", skip(self, payload))]
    async fn call(
        &self,
        domain: &str,
        service: &str,
        payload: Payload,
    ) -> Result<(), ContractError> {
        let body = serde_json::to_string(&payload)
            .map_err(|e| ContractError::service_call(domain, service, e.to_string()))?;
        info!(domain, service, payload = %body, "Service called");
        Ok(())
    }
}
