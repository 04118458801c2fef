//! Operating-system capabilities used by the lifecycle coordinator.
//!
//! Each capability is a small trait so the coordinator can be driven with
//! fakes in tests:
//! - autostart.rs: launch-at-login registration
//! - notifier.rs: messages for the operator
//! - launcher.rs: opening the config file and its folder

pub mod autostart;
pub mod launcher;
pub mod notifier;

pub use autostart::{
    registrar_for_current_exe, AutostartError, AutostartRegistrar, DesktopEntryRegistrar,
    UnavailableRegistrar,
};
pub use launcher::{Launcher, SystemLauncher};
pub use notifier::{LogNotifier, MessageNotifier};
