//! Configuration file watcher for hot reload.
//!
//! The watcher does not parse anything itself: each change to the file
//! enqueues a [`AgentCommand::Reload`] and the coordinator does the loading,
//! so a watched change follows the same path as a manual reload.
//!
//! The containing directory is watched rather than the file, so the watch
//! survives the file being absent at startup and editors that save by
//! renaming a temporary file over the original.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc::{self, error::TrySendError};

use crate::lifecycle::commands::AgentCommand;

/// A watcher that monitors the configuration file for changes.
pub struct ConfigWatcher {
    path: PathBuf,
    commands: mpsc::Sender<AgentCommand>,
}

impl ConfigWatcher {
    pub fn new(path: &Path, commands: mpsc::Sender<AgentCommand>) -> Self {
        Self {
            path: path.to_path_buf(),
            commands,
        }
    }

    /// Start watching. The returned watcher must be kept alive.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let dir = watch_dir(&self.path);
        let file_name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .ok_or_else(|| notify::Error::path_not_found().add_path(self.path.clone()))?;
        let tx = self.commands.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if touches_config(&event, &file_name) {
                        tracing::info!(kind = ?event.kind, "Config file change detected, requesting reload");
                        request_reload(&tx);
                    }
                }
                Err(e) => tracing::error!(error = %e, "Config watch error"),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&dir, RecursiveMode::NonRecursive)?;

        tracing::info!(path = %self.path.display(), dir = %dir.display(), "Config watcher started");
        Ok(watcher)
    }
}

fn watch_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Whether `event` creates, modifies or renames onto the config file.
fn touches_config(event: &Event, file_name: &OsString) -> bool {
    let relevant = event.kind.is_modify() || event.kind.is_create();
    relevant
        && event
            .paths
            .iter()
            .any(|p| p.file_name() == Some(file_name.as_os_str()))
}

fn request_reload(tx: &mpsc::Sender<AgentCommand>) {
    match tx.try_send(AgentCommand::Reload) {
        Ok(()) => {}
        // Signal and console commands share the queue, so this reload is lost.
        Err(TrySendError::Full(_)) => {
            tracing::warn!("Command queue full, config change dropped; reload manually")
        }
        Err(TrySendError::Closed(_)) => {
            tracing::debug!("Command queue closed, ignoring config change")
        }
    }
}
