//! Notification sink that emits tracing events.

use tracing::{error, info};

use crate::domain::ports::Notifier;

/// Writes each notification as a structured log line.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn success(&self, title: &str, body: &str) {
        info!(target: "land_registry::notify", title, body, "success");
    }

    fn error(&self, title: &str, body: &str) {
        error!(target: "land_registry::notify", title, body, "error");
    }
}
