//! Operator-facing messages.

/// Shows a message to whoever operates the agent.
pub trait MessageNotifier: Send + Sync {
    fn notify(&self, title: &str, body: &str);
}

/// Notifier that writes messages to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl MessageNotifier for LogNotifier {
    fn notify(&self, title: &str, body: &str) {
        tracing::info!(title, "{body}");
    }
}
