//! Host shutdown invocation.
//!
//! # Responsibilities
//! - Clamp the requested delay to a non-negative number of seconds
//! - Hand the request to the operating system's `shutdown` command
//! - Return as soon as the command has been spawned (fire-and-forget)

use std::process::{Command, Stdio};

use crate::observability::metrics;

/// The OS refused or could not be asked to shut down.
#[derive(Debug, thiserror::Error)]
pub enum InvokeError {
    #[error("failed to dispatch shutdown (delay {delay_secs}s): {source}")]
    Dispatch {
        delay_secs: u64,
        #[source]
        source: std::io::Error,
    },
}

/// Something that can ask the host to shut down.
pub trait ShutdownInvoker: Send + Sync + 'static {
    /// Schedule a shutdown `delay_secs` from now. Negative delays mean "now".
    fn invoke(&self, delay_secs: i64) -> Result<(), InvokeError>;
}

/// Clamp a requested delay to what the OS facility accepts.
pub fn clamp_delay(delay_secs: i64) -> u64 {
    u64::try_from(delay_secs).unwrap_or(0)
}

/// Arguments passed to the platform `shutdown` command.
#[cfg(windows)]
pub fn shutdown_args(delay_secs: u64) -> Vec<String> {
    vec!["/s".into(), "/t".into(), delay_secs.to_string()]
}

/// Arguments passed to the platform `shutdown` command.
///
/// Unix `shutdown` schedules in whole minutes, so the delay is rounded up.
#[cfg(not(windows))]
pub fn shutdown_args(delay_secs: u64) -> Vec<String> {
    let when = match delay_secs {
        0 => "now".to_string(),
        secs => format!("+{}", secs.div_ceil(60)),
    };
    vec!["-h".into(), when]
}

/// Invokes the real `shutdown` command.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemShutdown;

impl ShutdownInvoker for SystemShutdown {
    fn invoke(&self, delay_secs: i64) -> Result<(), InvokeError> {
        let delay_secs = clamp_delay(delay_secs);
        let result = Command::new("shutdown")
            .args(shutdown_args(delay_secs))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();

        match result {
            Ok(child) => {
                tracing::warn!(delay_secs, pid = child.id(), "Host shutdown dispatched");
                metrics::record_shutdown_dispatch(true);
                Ok(())
            }
            Err(source) => {
                tracing::error!(delay_secs, error = %source, "Host shutdown dispatch failed");
                metrics::record_shutdown_dispatch(false);
                Err(InvokeError::Dispatch { delay_secs, source })
            }
        }
    }
}

/// Logs the request instead of shutting the host down.
#[derive(Debug, Default, Clone, Copy)]
pub struct DryRunShutdown;

impl ShutdownInvoker for DryRunShutdown {
    fn invoke(&self, delay_secs: i64) -> Result<(), InvokeError> {
        let delay_secs = clamp_delay(delay_secs);
        tracing::warn!(
            delay_secs,
            args = ?shutdown_args(delay_secs),
            "Dry run: host shutdown not dispatched"
        );
        metrics::record_shutdown_dispatch(true);
        Ok(())
    }
}
