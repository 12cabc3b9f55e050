//! Config validation
//!
//! Rules:
//! - every `service` lives in the notify domain and names a service
//! - every target declares at least one condition
//!
//! Condition grammar errors are not checked here; they disable a single
//! target at notifier construction instead of failing the whole config.

use contracts::{ContractError, NotifyConfig, NOTIFY_DOMAIN};

/// Validate a parsed config
///
/// Returns the first error encountered, or Ok(()).
pub fn validate(config: &NotifyConfig) -> Result<(), ContractError> {
    validate_services(config)?;
    validate_conditions(config)?;
    Ok(())
}

/// Check service identifiers
fn validate_services(config: &NotifyConfig) -> Result<(), ContractError> {
    for (idx, target) in config.services.iter().enumerate() {
        if target.service.is_empty() {
            return Err(ContractError::config_validation(
                format!("services[{idx}].service"),
                "service cannot be empty",
            ));
        }
        if target.service_name().is_none() {
            return Err(ContractError::config_validation(
                format!("services[{idx}].service"),
                format!(
                    "'{}' is not an entity in the '{NOTIFY_DOMAIN}' domain",
                    target.service
                ),
            ));
        }
    }
    Ok(())
}

/// Check that every target declares a condition list
fn validate_conditions(config: &NotifyConfig) -> Result<(), ContractError> {
    for (idx, target) in config.services.iter().enumerate() {
        if !target.has_conditions() {
            return Err(ContractError::config_validation(
                format!("services[{idx}].condition"),
                format!("condition list cannot be empty for '{}'", target.service),
            ));
        }
    }
    Ok(())
}
