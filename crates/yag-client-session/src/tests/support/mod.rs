//! Shared doubles and helpers for session tests.

mod recording;

use serde_json::Value;

pub use recording::{ConnectionCall, FailurePlan, RecordingLauncher, RecordingNotifier};

use crate::session::SessionLifecycle;
use yag_client_config::ClientSettings;

/// Builds a lifecycle manager around clones of the supplied doubles.
pub fn lifecycle_with(
    launcher: &RecordingLauncher,
    notifier: &RecordingNotifier,
) -> SessionLifecycle {
    SessionLifecycle::new(Box::new(launcher.clone()), Box::new(notifier.clone()))
}

/// Builds a settings snapshot from a raw JSON value.
pub fn settings(raw: Value) -> ClientSettings {
    ClientSettings::from_value(raw)
}
