//! Line-oriented operator console on stdin.
//!
//! Each line is one command name (`reload`, `autostart`, `config`,
//! `folder`, `about`, `quit`). End of input stops the console but not the
//! agent, so running detached from a terminal is fine.
//!
//! Reading happens on a plain OS thread: a blocked stdin read cannot be
//! cancelled and must not hold up runtime shutdown.

use std::io::{self, BufRead};
use std::thread;

use tokio::sync::mpsc;

use crate::lifecycle::commands::AgentCommand;

pub fn spawn_console(commands: mpsc::Sender<AgentCommand>) -> io::Result<thread::JoinHandle<()>> {
    thread::Builder::new()
        .name("pc-agent-console".into())
        .spawn(move || read_commands(io::stdin().lock(), commands))
}

/// Parse commands from `input` and forward them until EOF, `quit`, or the
/// queue closes. Blocks; must not be called from async code.
pub fn read_commands<R: BufRead>(input: R, commands: mpsc::Sender<AgentCommand>) {
    for line in input.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                tracing::warn!(error = %e, "Console read failed");
                return;
            }
        };

        if line.trim().is_empty() {
            continue;
        }

        match line.parse::<AgentCommand>() {
            Ok(command) => {
                if commands.blocking_send(command).is_err() || command == AgentCommand::Quit {
                    return;
                }
            }
            Err(e) => tracing::warn!("{e}"),
        }
    }
    tracing::debug!("Console input closed");
}
