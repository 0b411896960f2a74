//! Configuration validation.

use super::Config;
use crate::core::identifier::validate_identifier;
use crate::error::{GatewayError, Result};

/// Validate the configuration.
pub fn validate(config: &Config) -> Result<()> {
    if config.namespace.is_empty() {
        return Err(GatewayError::config("namespace is required"));
    }
    validate_identifier(&config.namespace)
        .map_err(|e| GatewayError::config(format!("namespace: {}", e)))?;

    Ok(())
}
