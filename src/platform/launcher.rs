//! Opening files and folders with the desktop's default tools.

use std::io;
use std::path::Path;
use std::process::{Command, Stdio};

/// Hands a path to an external program. Does not wait for it.
pub trait Launcher: Send + Sync {
    fn open_file(&self, path: &Path) -> io::Result<()>;
    fn open_folder(&self, path: &Path) -> io::Result<()>;
}

/// Uses `notepad`/`explorer` on Windows, `open` on macOS, `xdg-open` elsewhere.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemLauncher;

impl SystemLauncher {
    fn spawn(program: &str, path: &Path) -> io::Result<()> {
        Command::new(program)
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map(drop)
    }
}

impl Launcher for SystemLauncher {
    fn open_file(&self, path: &Path) -> io::Result<()> {
        Self::spawn(file_opener(), path)
    }

    fn open_folder(&self, path: &Path) -> io::Result<()> {
        Self::spawn(folder_opener(), path)
    }
}

fn file_opener() -> &'static str {
    if cfg!(windows) {
        "notepad"
    } else if cfg!(target_os = "macos") {
        "open"
    } else {
        "xdg-open"
    }
}

fn folder_opener() -> &'static str {
    if cfg!(windows) {
        "explorer"
    } else if cfg!(target_os = "macos") {
        "open"
    } else {
        "xdg-open"
    }
}
