//! Operator commands and the sequential dispatcher.
//!
//! Every driver (signals, console, config watcher) only produces
//! [`AgentCommand`]s. One dispatcher consumes them in order, so coordinator
//! transitions never overlap.

use std::str::FromStr;

use tokio::sync::mpsc;

use crate::lifecycle::coordinator::Coordinator;

/// Capacity of the command queue shared by all drivers.
pub const COMMAND_QUEUE_DEPTH: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentCommand {
    Reload,
    ToggleAutostart,
    OpenConfig,
    OpenFolder,
    ShowAbout,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown command `{0}` (try: reload, autostart, config, folder, about, quit)")]
pub struct UnknownCommand(pub String);

impl FromStr for AgentCommand {
    type Err = UnknownCommand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reload" | "r" => Ok(AgentCommand::Reload),
            "autostart" | "toggle-autostart" => Ok(AgentCommand::ToggleAutostart),
            "config" | "open-config" => Ok(AgentCommand::OpenConfig),
            "folder" | "open-folder" => Ok(AgentCommand::OpenFolder),
            "about" => Ok(AgentCommand::ShowAbout),
            "quit" | "exit" | "q" => Ok(AgentCommand::Quit),
            _ => Err(UnknownCommand(s.trim().to_string())),
        }
    }
}

/// Bounded command queue.
pub fn command_channel() -> (mpsc::Sender<AgentCommand>, mpsc::Receiver<AgentCommand>) {
    mpsc::channel(COMMAND_QUEUE_DEPTH)
}

/// Run commands one at a time until `Quit` or until every sender is gone,
/// then stop the coordinator.
pub async fn dispatch(coordinator: &mut Coordinator, mut commands: mpsc::Receiver<AgentCommand>) {
    while let Some(command) = commands.recv().await {
        tracing::debug!(?command, "Dispatching command");

        let result = match command {
            AgentCommand::Reload => coordinator.reload().await.map(drop),
            AgentCommand::ToggleAutostart => coordinator.toggle_autostart().map(drop),
            AgentCommand::OpenConfig => coordinator.open_config(),
            AgentCommand::OpenFolder => coordinator.open_folder(),
            AgentCommand::ShowAbout => coordinator.show_about(),
            AgentCommand::Quit => break,
        };

        if let Err(e) = result {
            tracing::warn!(?command, error = %e, "Command failed");
        }
    }

    coordinator.shutdown().await;
}
