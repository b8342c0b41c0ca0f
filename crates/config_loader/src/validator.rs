//! Configuration validation.
//!
//! Rules:
//! - queue capacity is positive
//! - every sink rate limit is positive
//! - the retry ceiling is at least 1
//! - the input path is non-empty

use contracts::{ContractError, RelayConfig, SinkRole};

/// Validate a parsed configuration.
///
/// # Errors
/// Returns the first violated rule as a `ConfigValidation` error.
pub fn validate(config: &RelayConfig) -> Result<(), ContractError> {
    if config.queue.capacity == 0 {
        return Err(ContractError::config_validation(
            "queue.capacity",
            "must be greater than zero",
        ));
    }

    for role in SinkRole::ALL {
        if config.rate_for(role) == 0 {
            return Err(ContractError::config_validation(
                format!("sinks.{}.rate_limit", role.as_str().to_lowercase()),
                "must be greater than zero",
            ));
        }
    }

    if config.dlq.max_retries == 0 {
        return Err(ContractError::config_validation(
            "dlq.max_retries",
            "must be at least 1",
        ));
    }

    if config.input.file_path.as_os_str().is_empty() {
        return Err(ContractError::config_validation(
            "input.file_path",
            "must not be empty",
        ));
    }

    Ok(())
}
