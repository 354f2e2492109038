//! Notifier backed by the tracing pipeline.

use tally_core::Notifier;
use tracing::info;

/// Logs notifications instead of showing toasts.
///
/// Hosts with a real notification surface provide their own [`Notifier`];
/// this one keeps headless runs (and tests) observable.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, title: &str, message: &str) {
        info!(title, message, "notification");
    }
}
