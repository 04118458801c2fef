//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config.json (or .toml)
//!     → loader.rs (read & deserialize into ConfigRecord)
//!     → validation.rs (port range, timeout clamp)
//!     → AgentConfig (validated, immutable)
//!     → store.rs (published by the lifecycle coordinator)
//!     → read by HTTP handlers at request time
//!
//! On reload:
//!     watcher.rs / signal / console emits Reload
//!     → coordinator loads, applies port change, then publishes
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes replace it wholesale
//! - All persisted fields have defaults to allow minimal files
//! - The store never touches disk; persistence is a separate collaborator

pub mod loader;
pub mod schema;
pub mod store;
pub mod validation;
pub mod watcher;

pub use loader::{ConfigError, ConfigFile, ConfigPersistence};
pub use schema::{AgentConfig, ConfigRecord, DEFAULT_PORT, DEFAULT_SHUTDOWN_TIMEOUT_SECS};
pub use store::ConfigStore;
pub use validation::ValidationError;
