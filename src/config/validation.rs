//! Configuration validation.
//!
//! Serde handles syntax; this checks values. All problems are reported,
//! not just the first.

use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::SubmitterConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

fn check_url(errors: &mut Vec<ValidationError>, field: &str, value: &str) {
    if let Err(e) = value.parse::<url::Url>() {
        errors.push(ValidationError::new(field, format!("invalid URL '{}': {}", value, e)));
    }
}

fn check_positive(errors: &mut Vec<ValidationError>, field: &str, value: u64) {
    if value == 0 {
        errors.push(ValidationError::new(field, "must be greater than zero"));
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &SubmitterConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_url(&mut errors, "rpc.local", &config.rpc.local);
    check_url(&mut errors, "rpc.mainnet", &config.rpc.mainnet);
    for (i, url) in config.rpc.mainnet_failover.iter().enumerate() {
        check_url(&mut errors, &format!("rpc.mainnet_failover[{}]", i), url);
    }
    check_positive(&mut errors, "rpc.timeout_secs", config.rpc.timeout_secs);

    if config.wallet.private_key_env.trim().is_empty() {
        errors.push(ValidationError::new("wallet.private_key_env", "must not be empty"));
    }

    if let Some(url) = &config.extension.url {
        check_url(&mut errors, "extension.url", url);
    }
    check_positive(
        &mut errors,
        "extension.request_timeout_secs",
        config.extension.request_timeout_secs,
    );

    let confirmation = &config.confirmation;
    check_positive(&mut errors, "confirmation.poll_interval_ms", confirmation.poll_interval_ms);
    check_positive(&mut errors, "confirmation.max_attempts", confirmation.max_attempts as u64);
    check_positive(&mut errors, "confirmation.timeout_secs", confirmation.timeout_secs);
    if confirmation.max_poll_interval_ms < confirmation.poll_interval_ms {
        errors.push(ValidationError::new(
            "confirmation.max_poll_interval_ms",
            "must be at least poll_interval_ms",
        ));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("invalid socket address '{}'", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
