//! Configuration schema definitions.
//!
//! Two shapes live here:
//! - [`ConfigRecord`] mirrors the persisted file. Every field is optional on
//!   disk and falls back to its default, and the integers are signed so that
//!   out-of-range values reach validation instead of failing inside serde.
//! - [`AgentConfig`] is the validated, immutable value the rest of the agent
//!   works with. A reload produces a new value; nothing mutates one in place.

use serde::{Deserialize, Serialize};

/// Port the control service listens on when nothing else is configured.
pub const DEFAULT_PORT: u16 = 9876;

/// Delay handed to the OS shutdown facility when nothing else is configured.
pub const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u32 = 10;

/// Persisted configuration record.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ConfigRecord {
    /// TCP port of the control service.
    pub port: i64,

    /// Delay in seconds passed to the OS shutdown facility.
    pub shutdown_timeout_sec: i64,

    /// Whether the agent registers itself to start at login.
    pub autostart: bool,
}

impl Default for ConfigRecord {
    fn default() -> Self {
        Self {
            port: i64::from(DEFAULT_PORT),
            shutdown_timeout_sec: i64::from(DEFAULT_SHUTDOWN_TIMEOUT_SECS),
            autostart: false,
        }
    }
}

impl From<&AgentConfig> for ConfigRecord {
    fn from(config: &AgentConfig) -> Self {
        Self {
            port: i64::from(config.port),
            shutdown_timeout_sec: i64::from(config.shutdown_timeout_secs),
            autostart: config.autostart,
        }
    }
}

/// Validated agent configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgentConfig {
    /// TCP port of the control service, never zero.
    pub port: u16,

    /// Delay in seconds passed to the OS shutdown facility.
    pub shutdown_timeout_secs: u32,

    /// Whether the agent registers itself to start at login.
    pub autostart: bool,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            shutdown_timeout_secs: DEFAULT_SHUTDOWN_TIMEOUT_SECS,
            autostart: false,
        }
    }
}

impl AgentConfig {
    /// Copy of this configuration listening on another port.
    pub fn with_port(self, port: u16) -> Self {
        Self { port, ..self }
    }

    /// Copy of this configuration with a different autostart flag.
    pub fn with_autostart(self, autostart: bool) -> Self {
        Self { autostart, ..self }
    }

    /// One-line summary used in logs.
    pub fn status_line(&self) -> String {
        format!("Port: {} | Timeout: {}s", self.port, self.shutdown_timeout_secs)
    }

    /// Text shown by the About command.
    pub fn about_text(&self) -> String {
        format!(
            "PC Agent v{version}\n\
             Remote Shutdown Service\n\
             \n\
             Current Settings:\n\
             - Port: {port}\n\
             - Shutdown Timeout: {timeout} seconds\n\
             - Autostart: {autostart}\n\
             \n\
             API Endpoints:\n\
             - GET  /ping     - Health check\n\
             - POST /shutdown - Schedule shutdown\n\
             \n\
             Example:\n\
             curl -X POST http://localhost:{port}/shutdown",
            version = env!("CARGO_PKG_VERSION"),
            port = self.port,
            timeout = self.shutdown_timeout_secs,
            autostart = self.autostart,
        )
    }
}
