//! OS signal handling.
//!
//! - SIGHUP → reload configuration
//! - SIGUSR1 → toggle autostart
//! - SIGUSR2 → show about
//! - SIGTERM / Ctrl-C → quit
//!
//! Only Ctrl-C is available off Unix.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::lifecycle::commands::AgentCommand;

/// Forward signals as commands until `Quit` is sent or the queue closes.
pub fn spawn_signal_listener(commands: mpsc::Sender<AgentCommand>) -> JoinHandle<()> {
    tokio::spawn(async move {
        if let Err(e) = forward_signals(commands).await {
            tracing::error!(error = %e, "Signal handler failed");
        }
    })
}

#[cfg(unix)]
async fn forward_signals(commands: mpsc::Sender<AgentCommand>) -> std::io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut hangup = signal(SignalKind::hangup())?;
    let mut user1 = signal(SignalKind::user_defined1())?;
    let mut user2 = signal(SignalKind::user_defined2())?;
    let mut terminate = signal(SignalKind::terminate())?;

    loop {
        let command = tokio::select! {
            _ = hangup.recv() => AgentCommand::Reload,
            _ = user1.recv() => AgentCommand::ToggleAutostart,
            _ = user2.recv() => AgentCommand::ShowAbout,
            _ = terminate.recv() => AgentCommand::Quit,
            res = tokio::signal::ctrl_c() => {
                res?;
                AgentCommand::Quit
            }
        };

        tracing::info!(?command, "Signal received");
        if commands.send(command).await.is_err() || command == AgentCommand::Quit {
            return Ok(());
        }
    }
}

#[cfg(not(unix))]
async fn forward_signals(commands: mpsc::Sender<AgentCommand>) -> std::io::Result<()> {
    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown signal received");
    let _ = commands.send(AgentCommand::Quit).await;
    Ok(())
}
