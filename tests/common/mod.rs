//! Shared fakes and helpers for integration tests.
#![allow(dead_code)]

use std::io;
use std::net::{IpAddr, Ipv4Addr};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use pc_agent::config::{ConfigFile, ConfigStore};
use pc_agent::http::{AppState, ControlServer};
use pc_agent::lifecycle::{Collaborators, Coordinator};
use pc_agent::platform::{AutostartError, AutostartRegistrar, Launcher, MessageNotifier};
use pc_agent::power::{InvokeError, ShutdownInvoker};

pub const LOCALHOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

/// Records every delay it is asked to shut down with.
#[derive(Clone, Default)]
pub struct RecordingInvoker {
    calls: Arc<Mutex<Vec<i64>>>,
}

impl RecordingInvoker {
    pub fn calls(&self) -> Vec<i64> {
        self.calls.lock().unwrap().clone()
    }
}

impl ShutdownInvoker for RecordingInvoker {
    fn invoke(&self, delay_secs: i64) -> Result<(), InvokeError> {
        self.calls.lock().unwrap().push(delay_secs);
        Ok(())
    }
}

/// In-memory autostart switch that can be told to fail.
#[derive(Clone, Default)]
pub struct FakeRegistrar {
    enabled: Arc<AtomicBool>,
    failing: Arc<AtomicBool>,
}

impl FakeRegistrar {
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn force_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::SeqCst);
    }
}

impl AutostartRegistrar for FakeRegistrar {
    fn set_enabled(&self, enabled: bool) -> Result<(), AutostartError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(AutostartError::Io {
                path: PathBuf::from("fake-autostart"),
                source: io::Error::new(io::ErrorKind::PermissionDenied, "registry locked"),
            });
        }
        self.enabled.store(enabled, Ordering::SeqCst);
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }
}

#[derive(Clone, Default)]
pub struct RecordingNotifier {
    messages: Arc<Mutex<Vec<(String, String)>>>,
}

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<(String, String)> {
        self.messages.lock().unwrap().clone()
    }
}

impl MessageNotifier for RecordingNotifier {
    fn notify(&self, title: &str, body: &str) {
        self.messages
            .lock()
            .unwrap()
            .push((title.to_string(), body.to_string()));
    }
}

#[derive(Clone, Default)]
pub struct RecordingLauncher {
    files: Arc<Mutex<Vec<PathBuf>>>,
    folders: Arc<Mutex<Vec<PathBuf>>>,
}

impl RecordingLauncher {
    pub fn files(&self) -> Vec<PathBuf> {
        self.files.lock().unwrap().clone()
    }

    pub fn folders(&self) -> Vec<PathBuf> {
        self.folders.lock().unwrap().clone()
    }
}

impl Launcher for RecordingLauncher {
    fn open_file(&self, path: &Path) -> io::Result<()> {
        self.files.lock().unwrap().push(path.to_path_buf());
        Ok(())
    }

    fn open_folder(&self, path: &Path) -> io::Result<()> {
        self.folders.lock().unwrap().push(path.to_path_buf());
        Ok(())
    }
}

/// A coordinator wired to fakes and a config file in a temp directory.
pub struct Harness {
    pub coordinator: Coordinator,
    pub invoker: RecordingInvoker,
    pub registrar: FakeRegistrar,
    pub notifier: RecordingNotifier,
    pub launcher: RecordingLauncher,
    pub config_path: PathBuf,
    _dir: tempfile::TempDir,
}

impl Harness {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.json");
        Self::with_config_path(dir, config_path)
    }

    pub fn with_config_path(dir: tempfile::TempDir, config_path: PathBuf) -> Self {
        let invoker = RecordingInvoker::default();
        let registrar = FakeRegistrar::default();
        let notifier = RecordingNotifier::default();
        let launcher = RecordingLauncher::default();

        let store = ConfigStore::default();
        let server = control_server(&store, &invoker);
        let coordinator = Coordinator::new(
            store,
            server,
            Collaborators {
                persistence: Box::new(ConfigFile::new(&config_path)),
                autostart: Box::new(registrar.clone()),
                notifier: Box::new(notifier.clone()),
                launcher: Box::new(launcher.clone()),
            },
        );

        Self {
            coordinator,
            invoker,
            registrar,
            notifier,
            launcher,
            config_path,
            _dir: dir,
        }
    }

    pub fn registrar_enabled(&self) -> bool {
        self.registrar.is_enabled()
    }

    pub fn write_config(&self, port: u16, timeout: i64, autostart: bool) {
        write_config(&self.config_path, port, timeout, autostart);
    }
}

/// Loopback control server with a short drain timeout.
pub fn control_server(store: &ConfigStore, invoker: &RecordingInvoker) -> ControlServer {
    ControlServer::new(LOCALHOST, AppState::new(store.clone(), Arc::new(invoker.clone())))
        .with_drain_timeout(Duration::from_secs(1))
}

pub fn write_config(path: &Path, port: u16, timeout: i64, autostart: bool) {
    let body = serde_json::json!({
        "port": port,
        "shutdown_timeout_sec": timeout,
        "autostart": autostart,
    });
    std::fs::write(path, serde_json::to_string_pretty(&body).unwrap()).unwrap();
}

/// Client that never reuses connections, so every request dials the port.
pub fn fresh_client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap()
}

/// Client that keeps connections alive between requests.
pub fn pooled_client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap()
}

/// `GET /ping` on loopback; `Err` when nothing accepts the connection.
pub async fn ping(client: &reqwest::Client, port: u16) -> Result<(u16, String), reqwest::Error> {
    let res = client
        .get(format!("http://127.0.0.1:{port}/ping"))
        .send()
        .await?;
    let status = res.status().as_u16();
    Ok((status, res.text().await?))
}

/// `POST /shutdown` on loopback.
pub async fn shutdown(client: &reqwest::Client, port: u16) -> Result<(u16, String), reqwest::Error> {
    let res = client
        .post(format!("http://127.0.0.1:{port}/shutdown"))
        .send()
        .await?;
    let status = res.status().as_u16();
    Ok((status, res.text().await?))
}

pub async fn assert_refused(port: u16) {
    let result = ping(&fresh_client(), port).await;
    assert!(result.is_err(), "port {port} still answers: {result:?}");
}
