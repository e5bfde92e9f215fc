//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses, URLs, and value ranges
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: GatekeeperConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use axum::http::uri::Authority;
use std::net::SocketAddr;
use std::str::FromStr;
use url::Url;

use crate::config::schema::GatekeeperConfig;
use crate::observability::logging::LOG_LEVELS;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn err(field: &'static str, message: impl Into<String>) -> ValidationError {
    ValidationError {
        field,
        message: message.into(),
    }
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &GatekeeperConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if SocketAddr::from_str(&config.listener.bind_address).is_err() {
        errors.push(err(
            "listener.bind_address",
            format!("not a valid socket address: {}", config.listener.bind_address),
        ));
    }
    if config.listener.max_connections == 0 {
        errors.push(err("listener.max_connections", "must be greater than zero"));
    }

    if config.upstream.address.is_empty() {
        errors.push(err("upstream.address", "must not be empty"));
    } else if Authority::from_str(&config.upstream.address).is_err() {
        errors.push(err(
            "upstream.address",
            format!("not a valid authority: {}", config.upstream.address),
        ));
    }

    if Url::parse(&config.auth.base_url).is_err() {
        errors.push(err(
            "auth.base_url",
            format!("not a valid url: {}", config.auth.base_url),
        ));
    }
    if config.auth.request_timeout_secs == 0 {
        errors.push(err("auth.request_timeout_secs", "must be greater than zero"));
    }

    if config.role_cache.ttl_secs == 0 {
        errors.push(err("role_cache.ttl_secs", "must be greater than zero"));
    }
    if config.role_cache.sweep_interval_secs == 0 {
        errors.push(err(
            "role_cache.sweep_interval_secs",
            "must be greater than zero",
        ));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(err("timeouts.request_secs", "must be greater than zero"));
    }

    if !LOG_LEVELS.contains(&config.observability.log_level.as_str()) {
        errors.push(err(
            "observability.log_level",
            format!("unknown log level: {}", config.observability.log_level),
        ));
    }
    if config.observability.metrics_enabled
        && SocketAddr::from_str(&config.observability.metrics_address).is_err()
    {
        errors.push(err(
            "observability.metrics_address",
            format!(
                "not a valid socket address: {}",
                config.observability.metrics_address
            ),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
