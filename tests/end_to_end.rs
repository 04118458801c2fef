//! End-to-end scenarios on the default port. These share 9876, so they run
//! one at a time.

use pc_agent::config::DEFAULT_PORT;

mod common;

use common::{assert_refused, fresh_client, ping, pooled_client, shutdown, Harness};

static DEFAULT_PORT_LOCK: tokio::sync::Mutex<()> = tokio::sync::Mutex::const_new(());

#[tokio::test]
async fn default_configuration_end_to_end() {
    let _guard = DEFAULT_PORT_LOCK.lock().await;
    let mut h = Harness::new();
    h.registrar.force_enabled(true);

    let report = h.coordinator.startup().await.unwrap();
    assert!(report.is_clean(), "{report:?}");
    assert_eq!(report.published.port, DEFAULT_PORT);
    assert!(report.published.autostart, "missing config keeps OS autostart state");

    let client = fresh_client();
    assert_eq!(ping(&client, 9876).await.unwrap(), (200, "ok".into()));
    assert_eq!(
        shutdown(&client, 9876).await.unwrap(),
        (200, "shutdown scheduled".into())
    );
    assert_eq!(h.invoker.calls(), vec![10]);

    // A connection opened before the reload still sees the new timeout.
    let kept_alive = pooled_client();
    ping(&kept_alive, 9876).await.unwrap();
    h.write_config(9876, 3, true);
    h.coordinator.reload().await.unwrap();
    shutdown(&kept_alive, 9876).await.unwrap();
    assert_eq!(h.invoker.calls(), vec![10, 3]);

    h.write_config(9999, 3, true);
    h.coordinator.reload().await.unwrap();

    assert_refused(9876).await;
    assert_eq!(ping(&client, 9999).await.unwrap(), (200, "ok".into()));
    assert_eq!(h.coordinator.store().get().port, 9999);

    h.coordinator.shutdown().await;
    assert_refused(9999).await;
}

#[tokio::test]
async fn malformed_config_at_startup_falls_back_to_defaults() {
    let _guard = DEFAULT_PORT_LOCK.lock().await;
    let mut h = Harness::new();
    std::fs::write(&h.config_path, "port = ").unwrap();

    let report = h.coordinator.startup().await.unwrap();

    assert!(report.load_error.is_some());
    assert!(report.bind_error.is_none());
    assert_eq!(h.coordinator.store().get().port, DEFAULT_PORT);
    assert_eq!(ping(&fresh_client(), 9876).await.unwrap().0, 200);
    assert!(h
        .notifier
        .messages()
        .iter()
        .any(|(_, body)| body.starts_with("Config load error")));

    h.coordinator.shutdown().await;
}
