//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Drivers (signals.rs, console.rs, config watcher):
//!     produce AgentCommand → bounded queue
//!
//! Dispatcher (commands.rs):
//!     one command at a time → Coordinator method
//!
//! Coordinator (coordinator.rs):
//!     load config → move listener if needed → autostart → publish to store
//! ```
//!
//! # Design Decisions
//! - Commands are processed sequentially; only HTTP requests run concurrently
//! - Errors are reported per command; none of them stop the agent
//! - Quit stops the listener and is terminal

pub mod commands;
pub mod console;
pub mod coordinator;
pub mod signals;

pub use commands::{command_channel, dispatch, AgentCommand};
pub use coordinator::{Collaborators, Coordinator, CoordinatorError, TransitionReport};
