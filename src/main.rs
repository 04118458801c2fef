//! PC Agent
//!
//! A background agent exposing a minimal HTTP control surface that shuts the
//! host down on request.
//!
//! # Architecture Overview
//!
//! ```text
//!   signals ─┐
//!   console ─┼─▶ AgentCommand queue ─▶ lifecycle::Coordinator
//!   watcher ─┘                           │ load → rebind → publish
//!                                        ▼
//!                          ┌─────────────────────────┐
//!   GET  /ping     ───────▶│ http::ControlServer     │──▶ ConfigStore (read per request)
//!   POST /shutdown ───────▶│ one listener at a time  │──▶ power::ShutdownInvoker
//!                          └─────────────────────────┘
//! ```

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use pc_agent::config::{watcher::ConfigWatcher, ConfigFile, ConfigPersistence, ConfigStore};
use pc_agent::http::{AppState, ControlServer};
use pc_agent::lifecycle::{
    command_channel, console::spawn_console, dispatch, signals::spawn_signal_listener,
    Collaborators, Coordinator,
};
use pc_agent::observability::{logging, metrics};
use pc_agent::platform::{registrar_for_current_exe, LogNotifier, SystemLauncher};
use pc_agent::power::{DryRunShutdown, ShutdownInvoker, SystemShutdown};

#[derive(Parser)]
#[command(name = "pc-agent")]
#[command(about = "Remote shutdown agent with a minimal HTTP control surface", long_about = None)]
struct Cli {
    /// Configuration file (defaults to config.json next to the executable).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address the control listener binds to.
    #[arg(long, default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    bind_host: IpAddr,

    /// Tracing filter used when RUST_LOG is not set.
    #[arg(long, default_value = logging::DEFAULT_FILTER)]
    log_filter: String,

    /// Serve Prometheus metrics on this address.
    #[arg(long)]
    metrics_address: Option<SocketAddr>,

    /// Reload automatically when the configuration file changes.
    #[arg(long)]
    watch: bool,

    /// Log shutdown requests instead of shutting the host down.
    #[arg(long)]
    dry_run: bool,

    /// Seconds a closing listener may spend on in-flight requests.
    #[arg(long, default_value_t = 5)]
    drain_timeout_secs: u64,

    /// Do not read commands from stdin.
    #[arg(long)]
    no_console: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    logging::init_logging(&cli.log_filter);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "pc-agent starting");

    if let Some(addr) = cli.metrics_address {
        metrics::init_metrics(addr);
    }

    let persistence = match cli.config {
        Some(path) => ConfigFile::new(path),
        None => ConfigFile::beside_executable()?,
    };
    let config_path = persistence.path().to_path_buf();
    let registrar = registrar_for_current_exe();

    let invoker: Arc<dyn ShutdownInvoker> = if cli.dry_run {
        Arc::new(DryRunShutdown)
    } else {
        Arc::new(SystemShutdown)
    };

    let store = ConfigStore::default();
    let server = ControlServer::new(cli.bind_host, AppState::new(store.clone(), invoker))
        .with_drain_timeout(Duration::from_secs(cli.drain_timeout_secs));

    let mut coordinator = Coordinator::new(
        store,
        server,
        Collaborators {
            persistence: Box::new(persistence),
            autostart: registrar,
            notifier: Box::new(LogNotifier),
            launcher: Box::new(SystemLauncher),
        },
    );

    coordinator.startup().await?;

    let (commands_tx, commands_rx) = command_channel();
    spawn_signal_listener(commands_tx.clone());
    if !cli.no_console {
        if let Err(e) = spawn_console(commands_tx.clone()) {
            tracing::warn!(error = %e, "Console not started");
        }
    }

    let _watcher = if cli.watch {
        match ConfigWatcher::new(&config_path, commands_tx.clone()).run() {
            Ok(watcher) => Some(watcher),
            Err(e) => {
                tracing::warn!(path = %config_path.display(), error = %e, "Config watcher not started");
                None
            }
        }
    } else {
        None
    };
    drop(commands_tx);

    dispatch(&mut coordinator, commands_rx).await;

    tracing::info!("Shutdown complete");
    Ok(())
}
