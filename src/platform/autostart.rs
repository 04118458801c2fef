//! Login autostart registration.
//!
//! The registrar writes an XDG autostart desktop entry pointing at the
//! running executable. Disabling removes the entry; an entry that is already
//! gone counts as disabled.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// File name of the desktop entry inside the autostart directory.
pub const ENTRY_FILE_NAME: &str = "pc-agent.desktop";

#[derive(Debug, thiserror::Error)]
pub enum AutostartError {
    #[error("autostart entry {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("no user configuration directory on this system")]
    NoConfigDir,
    #[error("cannot resolve current executable: {0}")]
    CurrentExe(#[source] io::Error),
    #[error("autostart is unavailable: {0}")]
    Unavailable(String),
}

/// OS-level "launch at login" switch.
pub trait AutostartRegistrar: Send + Sync {
    /// Register (`true`) or unregister (`false`). Idempotent.
    fn set_enabled(&self, enabled: bool) -> Result<(), AutostartError>;

    /// Whether the agent is currently registered. Failures read as `false`.
    fn is_enabled(&self) -> bool;
}

/// Registrar backed by an XDG autostart desktop entry.
#[derive(Debug, Clone)]
pub struct DesktopEntryRegistrar {
    entry_path: PathBuf,
    exec: PathBuf,
}

impl DesktopEntryRegistrar {
    pub fn new(entry_path: impl Into<PathBuf>, exec: impl Into<PathBuf>) -> Self {
        Self {
            entry_path: entry_path.into(),
            exec: exec.into(),
        }
    }

    /// Entry in the user's autostart directory launching this executable.
    pub fn for_current_exe() -> Result<Self, AutostartError> {
        let exec = std::env::current_exe().map_err(AutostartError::CurrentExe)?;
        let dir = dirs::config_dir().ok_or(AutostartError::NoConfigDir)?;
        Ok(Self::new(dir.join("autostart").join(ENTRY_FILE_NAME), exec))
    }

    pub fn entry_path(&self) -> &Path {
        &self.entry_path
    }

    fn entry_contents(&self) -> String {
        format!(
            "[Desktop Entry]\n\
             Type=Application\n\
             Name=PC Agent\n\
             Comment=Remote shutdown service\n\
             Exec=\"{}\"\n\
             X-GNOME-Autostart-enabled=true\n",
            self.exec.display()
        )
    }

    fn io_error(&self, source: io::Error) -> AutostartError {
        AutostartError::Io {
            path: self.entry_path.clone(),
            source,
        }
    }
}

impl AutostartRegistrar for DesktopEntryRegistrar {
    fn set_enabled(&self, enabled: bool) -> Result<(), AutostartError> {
        if enabled {
            if let Some(parent) = self.entry_path.parent() {
                fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
            }
            fs::write(&self.entry_path, self.entry_contents()).map_err(|e| self.io_error(e))?;
        } else {
            match fs::remove_file(&self.entry_path) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(self.io_error(e)),
            }
        }

        tracing::debug!(enabled, entry = %self.entry_path.display(), "Autostart entry updated");
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        self.entry_path.is_file()
    }
}

/// Stand-in used when no autostart location can be resolved.
///
/// Always reports disabled. Disabling succeeds; enabling fails with the
/// reason the real registrar could not be built.
#[derive(Debug, Clone)]
pub struct UnavailableRegistrar {
    reason: String,
}

impl UnavailableRegistrar {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl AutostartRegistrar for UnavailableRegistrar {
    fn set_enabled(&self, enabled: bool) -> Result<(), AutostartError> {
        if enabled {
            return Err(AutostartError::Unavailable(self.reason.clone()));
        }
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        false
    }
}

/// The desktop-entry registrar, or a disabled stand-in if it cannot be built.
pub fn registrar_for_current_exe() -> Box<dyn AutostartRegistrar> {
    match DesktopEntryRegistrar::for_current_exe() {
        Ok(registrar) => Box::new(registrar),
        Err(e) => {
            tracing::warn!(error = %e, "Autostart unavailable, continuing without it");
            Box::new(UnavailableRegistrar::new(e.to_string()))
        }
    }
}
