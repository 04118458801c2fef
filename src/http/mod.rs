//! HTTP control surface.
//!
//! # Data Flow
//! ```text
//! TCP connection on the configured port
//!     → server.rs (listener ownership, Axum router, middleware)
//!     → handlers.rs (/ping, /shutdown)
//!     → ConfigStore read at request time
//!     → power::ShutdownInvoker
//! ```

pub mod handlers;
pub mod server;

pub use handlers::AppState;
pub use server::{BindError, ControlServer, ListenerId};
