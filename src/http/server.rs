//! HTTP control service.
//!
//! # Responsibilities
//! - Own at most one live listener, bound to the configured port
//! - Route `/ping` and `/shutdown`
//! - Swap the listener when the port changes, closing the old one first
//!
//! # Design Decisions
//! - The swap runs under one async mutex, so concurrent `start` calls cannot
//!   both open a listener
//! - Closing is graceful with a bounded drain; whatever is still running
//!   after the drain timeout is aborted
//! - Serving runs on its own task; `start` returns once the socket is bound

use std::io;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use axum::{
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::{oneshot, Mutex};
use tokio::task::JoinHandle;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use uuid::Uuid;

use crate::http::handlers::{ping, trigger_shutdown, AppState};
use crate::observability::metrics;

/// How long a closing listener may spend finishing in-flight requests.
pub const DEFAULT_DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// The control listener could not be bound.
#[derive(Debug, thiserror::Error)]
#[error("failed to bind control listener on port {port}: {source}")]
pub struct BindError {
    pub port: u16,
    #[source]
    pub source: io::Error,
}

/// Identity of one bound listener. A new id means a new socket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(Uuid);

impl ListenerId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for ListenerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "listener-{}", self.0)
    }
}

/// A bound listener and the task serving it.
struct ActiveListener {
    id: ListenerId,
    port: u16,
    local_addr: SocketAddr,
    shutdown_tx: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl ActiveListener {
    /// Stop accepting, drain in-flight requests, then sever the rest.
    async fn close(self, drain_timeout: Duration) {
        let ActiveListener {
            id,
            port,
            shutdown_tx,
            mut task,
            ..
        } = self;

        // The receiver is gone only if the serving task already exited.
        let _ = shutdown_tx.send(());

        match tokio::time::timeout(drain_timeout, &mut task).await {
            Ok(Ok(())) => {
                tracing::info!(port, listener_id = %id, "Control listener closed");
            }
            Ok(Err(e)) => {
                tracing::warn!(port, listener_id = %id, error = %e, "Control listener task ended abnormally");
            }
            Err(_) => {
                tracing::warn!(
                    port,
                    listener_id = %id,
                    drain_timeout = ?drain_timeout,
                    "Drain timeout elapsed, severing remaining connections"
                );
                task.abort();
                let _ = task.await;
            }
        }
    }
}

/// HTTP control service owning at most one listener.
pub struct ControlServer {
    host: IpAddr,
    state: AppState,
    drain_timeout: Duration,
    active: Mutex<Option<ActiveListener>>,
}

impl ControlServer {
    /// Create an unbound service that will listen on `host`.
    pub fn new(host: IpAddr, state: AppState) -> Self {
        Self {
            host,
            state,
            drain_timeout: DEFAULT_DRAIN_TIMEOUT,
            active: Mutex::new(None),
        }
    }

    pub fn with_drain_timeout(mut self, drain_timeout: Duration) -> Self {
        self.drain_timeout = drain_timeout;
        self
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Make sure the service is listening on `port`.
    ///
    /// Already listening on `port` is a no-op. Listening elsewhere closes the
    /// old listener before binding the new one; if that bind fails the
    /// service is left unbound and the error is returned.
    pub async fn start(&self, port: u16) -> Result<ListenerId, BindError> {
        let mut active = self.active.lock().await;

        if let Some(current) = active.as_ref() {
            if current.port == port {
                tracing::debug!(port, listener_id = %current.id, "Control listener already bound");
                return Ok(current.id);
            }
        }

        let restarting = match active.take() {
            Some(previous) => {
                tracing::info!(from = previous.port, to = port, "Moving control listener");
                previous.close(self.drain_timeout).await;
                true
            }
            None => false,
        };

        let addr = SocketAddr::new(self.host, port);
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| BindError { port, source })?;
        let local_addr = listener
            .local_addr()
            .map_err(|source| BindError { port, source })?;

        let id = ListenerId::new();
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let app = build_router(self.state.clone());

        let task = tokio::spawn(async move {
            let result = axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.await;
                })
                .await;
            if let Err(e) = result {
                tracing::error!(port, listener_id = %id, error = %e, "Control listener failed");
            }
        });

        tracing::info!(port, listener_id = %id, address = %local_addr, "Control listener bound");
        if restarting {
            metrics::record_listener_restart();
        }

        *active = Some(ActiveListener {
            id,
            port,
            local_addr,
            shutdown_tx,
            task,
        });
        Ok(id)
    }

    /// Close the listener if there is one. Safe to call repeatedly.
    pub async fn stop(&self) {
        let mut active = self.active.lock().await;
        match active.take() {
            Some(previous) => previous.close(self.drain_timeout).await,
            None => tracing::debug!("Control listener already stopped"),
        }
    }

    /// Port of the live listener, if any.
    pub async fn bound_port(&self) -> Option<u16> {
        self.active.lock().await.as_ref().map(|a| a.port)
    }

    /// Identity of the live listener, if any.
    pub async fn listener_id(&self) -> Option<ListenerId> {
        self.active.lock().await.as_ref().map(|a| a.id)
    }

    /// Socket address of the live listener, if any.
    pub async fn local_addr(&self) -> Option<SocketAddr> {
        self.active.lock().await.as_ref().map(|a| a.local_addr)
    }
}

/// Build the control router with its middleware layers.
#[allow(deprecated)]
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/ping", get(ping))
        .route("/shutdown", post(trigger_shutdown))
        .with_state(state)
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}
