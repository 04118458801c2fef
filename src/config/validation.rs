//! Configuration validation.
//!
//! Serde handles the syntax; this module turns a [`ConfigRecord`] into an
//! [`AgentConfig`]:
//! - the port must be within 1..=65535
//! - a negative shutdown timeout is clamped to zero, a huge one to `u32::MAX`
//!
//! All problems are reported together, not just the first.

use crate::config::schema::{AgentConfig, ConfigRecord};

/// A single semantic problem with a configuration record.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("port {0} is outside 1..=65535")]
    PortOutOfRange(i64),
}

/// Validate a record and build the immutable configuration from it.
pub fn validate_record(record: &ConfigRecord) -> Result<AgentConfig, Vec<ValidationError>> {
    let mut errors = Vec::new();

    let port = match u16::try_from(record.port) {
        Ok(port) if port != 0 => port,
        _ => {
            errors.push(ValidationError::PortOutOfRange(record.port));
            0
        }
    };

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(AgentConfig {
        port,
        shutdown_timeout_secs: clamp_timeout(record.shutdown_timeout_sec),
        autostart: record.autostart,
    })
}

fn clamp_timeout(secs: i64) -> u32 {
    u32::try_from(secs.max(0)).unwrap_or(u32::MAX)
}
