//! Control endpoint handlers.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::config::ConfigStore;
use crate::observability::metrics;
use crate::power::ShutdownInvoker;

pub const PING_BODY: &str = "ok";
pub const SHUTDOWN_BODY: &str = "shutdown scheduled";

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: ConfigStore,
    pub invoker: Arc<dyn ShutdownInvoker>,
}

impl AppState {
    pub fn new(store: ConfigStore, invoker: Arc<dyn ShutdownInvoker>) -> Self {
        Self { store, invoker }
    }
}

/// `GET /ping`: liveness probe, independent of configuration.
pub async fn ping() -> &'static str {
    metrics::record_request("ping", StatusCode::OK.as_u16());
    PING_BODY
}

/// `POST /shutdown`: schedule a host shutdown with the timeout current right now.
pub async fn trigger_shutdown(State(state): State<AppState>) -> Response {
    let timeout = state.store.get().shutdown_timeout_secs;
    tracing::info!(delay_secs = timeout, "Shutdown requested");

    match state.invoker.invoke(i64::from(timeout)) {
        Ok(()) => {
            metrics::record_request("shutdown", StatusCode::OK.as_u16());
            (StatusCode::OK, SHUTDOWN_BODY).into_response()
        }
        Err(e) => {
            tracing::error!(delay_secs = timeout, error = %e, "Shutdown invocation failed");
            metrics::record_request("shutdown", StatusCode::INTERNAL_SERVER_ERROR.as_u16());
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}
