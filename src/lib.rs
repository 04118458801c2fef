//! PC Agent library: a remote shutdown control service with live-reloadable
//! configuration.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod platform;
pub mod power;

pub use config::{AgentConfig, ConfigStore};
pub use http::ControlServer;
pub use lifecycle::Coordinator;
