//! Structured logging.
//!
//! `RUST_LOG` wins when set; otherwise the filter passed by the binary
//! (from `--log-filter`) is used.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter when neither `RUST_LOG` nor `--log-filter` is given.
pub const DEFAULT_FILTER: &str = "pc_agent=info,tower_http=info";

/// Install the global tracing subscriber. Call once, early in `main`.
pub fn init_logging(fallback_filter: &str) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback_filter.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();
}
