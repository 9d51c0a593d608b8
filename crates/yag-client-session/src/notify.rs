//! User-visible failure notifications.

use tracing::error;

use crate::LOG_TARGET;

/// Sink for user-visible error notifications.
///
/// An editor embedding implements this with its notification UI so start
/// failures reach the user as a visible, non-blocking message. Headless
/// hosts can use [`LogNotifier`].
pub trait UserNotifier: Send {
    /// Shows a non-blocking error notification.
    fn show_error(&self, message: &str);
}

/// Notifier that routes messages to the tracing log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl UserNotifier for LogNotifier {
    fn show_error(&self, message: &str) {
        error!(target: LOG_TARGET, "{message}");
    }
}
