//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate header names, addresses and value ranges
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RegistryConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use axum::http::HeaderName;
use thiserror::Error;

use crate::config::schema::RegistryConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("server.bind_address '{0}' is not a socket address")]
    BindAddress(String),

    #[error("server.host must not be empty")]
    EmptyHost,

    #[error("server.port must not be 0")]
    ZeroPort,

    #[error("forward_headers.{field} '{value}' is not a valid header name")]
    HeaderName { field: &'static str, value: String },

    #[error("api.base_path '{0}' must start with '/' and must not end with '/'")]
    BasePath(String),

    #[error("timeouts.request_secs must be greater than 0")]
    ZeroTimeout,

    #[error("observability.metrics_address '{0}' is not a socket address")]
    MetricsAddress(String),
}

/// Check a parsed configuration, collecting every problem.
pub fn validate_config(config: &RegistryConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.server.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.server.bind_address.clone()));
    }
    if config.server.host.trim().is_empty() {
        errors.push(ValidationError::EmptyHost);
    }
    if config.server.port == Some(0) {
        errors.push(ValidationError::ZeroPort);
    }

    for (field, name) in config.forward_headers.named() {
        match name {
            Some(name) if !name.is_empty() => {
                if HeaderName::from_bytes(name.as_bytes()).is_err() {
                    errors.push(ValidationError::HeaderName {
                        field,
                        value: name.to_string(),
                    });
                }
            }
            _ => {}
        }
    }

    let base = &config.api.base_path;
    if !base.is_empty() && (!base.starts_with('/') || base.ends_with('/')) {
        errors.push(ValidationError::BasePath(base.clone()));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
