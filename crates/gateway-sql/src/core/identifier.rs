//! Identifier validation for field, collection and namespace names.
//!
//! Field names from filter objects and payloads are written into SQL text
//! unquoted (qualified names and regex pattern keys rely on the bare form),
//! so every name is validated before it reaches a statement.

use crate::error::{GatewayError, Result};

/// Maximum identifier length (conservative limit across databases).
/// - PostgreSQL: 63 bytes
/// - SQL Server: 128 characters
/// - MySQL: 64 characters
const MAX_IDENTIFIER_LENGTH: usize = 128;

/// Why an identifier was rejected.
fn identifier_problem(name: &str) -> Option<String> {
    if name.is_empty() {
        return Some("identifier cannot be empty".to_string());
    }

    if name.contains('\0') {
        return Some(format!(
            "SECURITY: identifier contains null byte (possible injection attempt): {:?}",
            name
        ));
    }

    if name.len() > MAX_IDENTIFIER_LENGTH {
        return Some(format!(
            "identifier exceeds maximum length of {} bytes (got {} bytes)",
            MAX_IDENTIFIER_LENGTH,
            name.len()
        ));
    }

    if let Some(c) = name
        .chars()
        .find(|c| !(c.is_alphanumeric() || *c == '_' || *c == '.'))
    {
        return Some(format!("identifier {:?} contains {:?}", name, c));
    }

    if name.starts_with('.') || name.ends_with('.') || name.contains("..") {
        return Some(format!("identifier {:?} has an empty path segment", name));
    }

    None
}

/// Validate an identifier.
///
/// Accepts alphanumerics, `_` and `.` (for `collection.field` names).
///
/// # Errors
///
/// Returns `GatewayError::Config` for invalid identifiers.
pub fn validate_identifier(name: &str) -> Result<()> {
    match identifier_problem(name) {
        Some(problem) => Err(GatewayError::Config(problem)),
        None => Ok(()),
    }
}

/// Validate a field name found in a filter object.
///
/// # Errors
///
/// Returns `GatewayError::InvalidFilterShape` pointing at `path`.
pub fn validate_filter_field(path: &str, name: &str) -> Result<()> {
    match identifier_problem(name) {
        Some(problem) => Err(GatewayError::filter_shape(path, problem)),
        None => Ok(()),
    }
}

/// Validate a column name found in an insert/update payload.
///
/// # Errors
///
/// Returns `GatewayError::InvalidPayload`.
pub fn validate_payload_field(name: &str) -> Result<()> {
    match identifier_problem(name) {
        Some(problem) => Err(GatewayError::InvalidPayload(problem)),
        None => Ok(()),
    }
}
