//! Configuration validation for the report facade.

use crate::config::{EngineConfig, HttpServerConfig, ReportsConfig};
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use tracing::debug;

/// Validate the entire configuration.
pub fn validate_config(config: &ReportsConfig) -> Result<(), ValidationError> {
    validate_prefix(&config.prefix)?;
    validate_engine(&config.engine)?;
    validate_http_server(&config.http_server)?;
    debug!(prefix = %config.prefix, program = %config.engine.program, "validated configuration");
    Ok(())
}

/// The prefix must select direct children of the catalog root.
fn validate_prefix(prefix: &str) -> Result<(), ValidationError> {
    if prefix.is_empty() {
        return Err(ValidationError::InvalidPrefix {
            prefix: prefix.to_string(),
            reason: "Prefix cannot be empty".to_string(),
        });
    }

    if prefix.contains('/') || prefix.contains('\\') {
        return Err(ValidationError::InvalidPrefix {
            prefix: prefix.to_string(),
            reason: "Prefix cannot contain path separators".to_string(),
        });
    }

    if prefix.contains('*') || prefix.contains('?') {
        return Err(ValidationError::InvalidPrefix {
            prefix: prefix.to_string(),
            reason: "Prefix is a literal and cannot contain wildcard characters".to_string(),
        });
    }

    Ok(())
}

fn validate_engine(engine: &EngineConfig) -> Result<(), ValidationError> {
    if engine.program.trim().is_empty() {
        return Err(ValidationError::MissingRequiredField {
            field: "engine.program".to_string(),
        });
    }

    if engine.timeout_secs == Some(0) {
        return Err(ValidationError::InvalidTimeout {
            reason: "timeoutSecs must be greater than zero; omit it to disable the limit".to_string(),
        });
    }

    for key in engine.env.keys() {
        validate_env_key(key)?;
    }

    Ok(())
}

/// The HTTP transport has no authentication, so it never leaves the host.
fn validate_http_server(http_server: &HttpServerConfig) -> Result<(), ValidationError> {
    if !http_server.bind_address.ip().is_loopback() {
        return Err(ValidationError::NonLoopbackBind {
            address: http_server.bind_address.to_string(),
        });
    }
    Ok(())
}

/// Validate an environment variable key.
static ENV_KEY_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("env key regex should compile"));

fn validate_env_key(key: &str) -> Result<(), ValidationError> {
    if !ENV_KEY_REGEX.is_match(key) {
        return Err(ValidationError::InvalidEnvKey {
            key: key.to_string(),
            reason: "Environment variable keys must start with a letter or underscore, followed by letters, numbers, or underscores"
                .to_string(),
        });
    }

    Ok(())
}

/// Errors that can occur during validation.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid report prefix '{prefix}': {reason}")]
    InvalidPrefix { prefix: String, reason: String },

    #[error("Missing required field '{field}'")]
    MissingRequiredField { field: String },

    #[error("Invalid engine timeout: {reason}")]
    InvalidTimeout { reason: String },

    #[error("Invalid environment variable key '{key}': {reason}")]
    InvalidEnvKey { key: String, reason: String },

    #[error("HTTP bind address {address} is not a loopback address")]
    NonLoopbackBind { address: String },
}
