//! Lifecycle coordinator.
//!
//! Sequences configuration changes into listener transitions and publishes
//! the resulting configuration. Transitions:
//!
//! ```text
//! startup          load (or defaults) → bind → autostart → publish
//! reload           load → rebind if port differs → autostart → publish
//! toggle autostart registrar → publish → persist
//! shutdown         stop listener → terminated (every later call fails)
//! ```
//!
//! The store never shows a port the coordinator failed to bind; a failed
//! rebind keeps the previous port while the other fields still apply.

use std::io;
use std::path::{Path, PathBuf};

use crate::config::{AgentConfig, ConfigError, ConfigPersistence, ConfigStore};
use crate::http::{BindError, ControlServer};
use crate::platform::{AutostartError, AutostartRegistrar, Launcher, MessageNotifier};

const NOTIFY_TITLE: &str = "PC Agent";

#[derive(Debug, thiserror::Error)]
pub enum CoordinatorError {
    #[error("configuration could not be loaded: {0}")]
    Load(#[source] ConfigError),
    #[error("configuration could not be saved: {0}")]
    Persist(#[source] ConfigError),
    #[error("autostart could not be changed: {0}")]
    Autostart(#[from] AutostartError),
    #[error("cannot open {}: {source}", .path.display())]
    Launch {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("agent is shutting down")]
    Terminated,
}

/// Outcome of a startup or reload transition.
///
/// Partial failures do not abort the transition; they are collected here
/// next to the configuration that ended up published.
#[derive(Debug)]
pub struct TransitionReport {
    pub published: AgentConfig,
    /// Startup only: the persisted file was unreadable and defaults were used.
    pub load_error: Option<ConfigError>,
    pub bind_error: Option<BindError>,
    pub autostart_error: Option<AutostartError>,
}

impl TransitionReport {
    pub fn is_clean(&self) -> bool {
        self.load_error.is_none() && self.bind_error.is_none() && self.autostart_error.is_none()
    }
}

/// OS-facing collaborators the coordinator drives.
pub struct Collaborators {
    pub persistence: Box<dyn ConfigPersistence>,
    pub autostart: Box<dyn AutostartRegistrar>,
    pub notifier: Box<dyn MessageNotifier>,
    pub launcher: Box<dyn Launcher>,
}

pub struct Coordinator {
    store: ConfigStore,
    server: ControlServer,
    persistence: Box<dyn ConfigPersistence>,
    autostart: Box<dyn AutostartRegistrar>,
    notifier: Box<dyn MessageNotifier>,
    launcher: Box<dyn Launcher>,
    terminated: bool,
}

impl Coordinator {
    /// `server` must have been built with a handle to the same `store`.
    pub fn new(store: ConfigStore, server: ControlServer, collaborators: Collaborators) -> Self {
        Self {
            store,
            server,
            persistence: collaborators.persistence,
            autostart: collaborators.autostart,
            notifier: collaborators.notifier,
            launcher: collaborators.launcher,
            terminated: false,
        }
    }

    pub fn store(&self) -> &ConfigStore {
        &self.store
    }

    pub fn server(&self) -> &ControlServer {
        &self.server
    }

    pub fn config_path(&self) -> &Path {
        self.persistence.path()
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    /// Load configuration, bind the listener, apply autostart, publish.
    pub async fn startup(&mut self) -> Result<TransitionReport, CoordinatorError> {
        self.ensure_running()?;

        let (proposed, load_error) = match self.persistence.load() {
            Ok(Some(config)) => (config, None),
            Ok(None) => {
                tracing::info!(path = %self.config_path().display(), "No persisted configuration, using defaults");
                (self.defaults(), None)
            }
            Err(e) => {
                tracing::warn!(path = %self.config_path().display(), error = %e, "Configuration load failed, using defaults");
                self.notifier
                    .notify(NOTIFY_TITLE, &format!("Config load error: {e}"));
                (self.defaults(), Some(e))
            }
        };

        let bind_error = match self.server.start(proposed.port).await {
            Ok(_) => None,
            Err(e) => {
                tracing::error!(port = proposed.port, error = %e, "Control service failed to start");
                self.notifier
                    .notify(NOTIFY_TITLE, &format!("Server start error: {e}"));
                Some(e)
            }
        };

        let (autostart, autostart_error) = self.apply_autostart(proposed.autostart);
        let published = proposed.with_autostart(autostart);
        self.store.set(published);

        tracing::info!(status = %published.status_line(), autostart, "Agent started");
        Ok(TransitionReport {
            published,
            load_error,
            bind_error,
            autostart_error,
        })
    }

    /// Re-read persisted configuration and move the listener if the port changed.
    ///
    /// A load error aborts the reload and leaves everything as it was. A bind
    /// error leaves the service unbound and the previous port published; the
    /// timeout and autostart changes are still applied.
    pub async fn reload(&mut self) -> Result<TransitionReport, CoordinatorError> {
        self.ensure_running()?;

        let proposed = match self.persistence.load() {
            Ok(Some(config)) => config,
            Ok(None) => self.defaults(),
            Err(e) => {
                tracing::warn!(path = %self.config_path().display(), error = %e, "Reload aborted, keeping current configuration");
                self.notifier
                    .notify(NOTIFY_TITLE, &format!("Config load error: {e}"));
                return Err(CoordinatorError::Load(e));
            }
        };

        let previous = self.store.get();
        let mut published = proposed;
        let mut bind_error = None;

        if self.server.bound_port().await != Some(proposed.port) {
            match self.server.start(proposed.port).await {
                Ok(id) => {
                    tracing::info!(from = previous.port, to = proposed.port, listener_id = %id, "Control service restarted");
                }
                Err(e) => {
                    tracing::error!(port = proposed.port, error = %e, "Failed to restart control service");
                    self.notifier
                        .notify(NOTIFY_TITLE, &format!("Failed to restart server: {e}"));
                    published = published.with_port(previous.port);
                    bind_error = Some(e);
                }
            }
        }

        let (autostart, autostart_error) = self.apply_autostart(proposed.autostart);
        published = published.with_autostart(autostart);
        self.store.set(published);

        tracing::info!(status = %published.status_line(), autostart, "Configuration reloaded");
        Ok(TransitionReport {
            published,
            load_error: None,
            bind_error,
            autostart_error,
        })
    }

    /// Flip the autostart flag. Nothing is published unless the OS accepts it.
    ///
    /// A save failure is reported, but the published flag stays flipped.
    pub fn toggle_autostart(&mut self) -> Result<AgentConfig, CoordinatorError> {
        self.ensure_running()?;

        let current = self.store.get();
        let enabled = !current.autostart;
        self.autostart.set_enabled(enabled)?;

        let updated = current.with_autostart(enabled);
        self.store.set(updated);
        tracing::info!(autostart = enabled, "Autostart toggled");

        self.persistence
            .save(&updated)
            .map_err(CoordinatorError::Persist)?;
        Ok(updated)
    }

    /// Open the config file in an editor, writing it first if it does not exist.
    pub fn open_config(&self) -> Result<(), CoordinatorError> {
        self.ensure_running()?;

        let path = self.config_path().to_path_buf();
        if !path.exists() {
            self.persistence
                .save(&self.store.get())
                .map_err(CoordinatorError::Persist)?;
        }
        self.launcher
            .open_file(&path)
            .map_err(|source| CoordinatorError::Launch { path, source })
    }

    /// Open the directory holding the config file.
    pub fn open_folder(&self) -> Result<(), CoordinatorError> {
        self.ensure_running()?;

        let dir = match self.config_path().parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        self.launcher
            .open_folder(&dir)
            .map_err(|source| CoordinatorError::Launch { path: dir, source })
    }

    pub fn show_about(&self) -> Result<(), CoordinatorError> {
        self.ensure_running()?;
        self.notifier
            .notify("About PC Agent", &self.store.get().about_text());
        Ok(())
    }

    /// Stop the control service. Terminal: later calls return `Terminated`.
    pub async fn shutdown(&mut self) {
        if self.terminated {
            return;
        }
        self.server.stop().await;
        self.terminated = true;
        tracing::info!("Lifecycle coordinator stopped");
    }

    fn ensure_running(&self) -> Result<(), CoordinatorError> {
        if self.terminated {
            return Err(CoordinatorError::Terminated);
        }
        Ok(())
    }

    /// Defaults, keeping whatever autostart state the OS reports.
    fn defaults(&self) -> AgentConfig {
        AgentConfig::default().with_autostart(self.autostart.is_enabled())
    }

    /// Apply the requested autostart state; on failure fall back to the actual one.
    fn apply_autostart(&self, enabled: bool) -> (bool, Option<AutostartError>) {
        match self.autostart.set_enabled(enabled) {
            Ok(()) => (enabled, None),
            Err(e) => {
                let actual = self.autostart.is_enabled();
                tracing::warn!(requested = enabled, actual, error = %e, "Autostart could not be applied");
                (actual, Some(e))
            }
        }
    }
}
