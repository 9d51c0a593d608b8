//! The single client session and its lifecycle manager.

use std::fmt;

use lsp_types::{
    ClientCapabilities, ClientInfo, InitializeParams, TextDocumentClientCapabilities,
    TextDocumentSyncClientCapabilities,
};
use serde_json::Value;
use tracing::debug;

use crate::LOG_TARGET;
use crate::connection::{ServerConnection, ServerIdentity, ServerLauncher};
use crate::error::SessionError;
use crate::notify::UserNotifier;
use crate::selector::DocumentSelector;
use yag_client_config::{ClientSettings, LaunchChannel, ServerOptions};

/// Client name sent as `clientInfo` and used in failure notifications.
pub const CLIENT_NAME: &str = "yag-template-client";

/// Position of the session in its lifecycle.
///
/// `Starting` and `Stopping` are transient: they are only observable while
/// `activate` or `deactivate` is in flight. A failed start lands in the
/// terminal `FailedToStart` state with no session retained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// No activation has happened yet.
    Unstarted,
    /// `activate` is spawning the server and running the handshake.
    Starting,
    /// The session is live.
    Running,
    /// `deactivate` is stopping the server.
    Stopping,
    /// The session has been stopped.
    Stopped,
    /// The start attempt failed; no session exists.
    FailedToStart,
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Unstarted => "unstarted",
            Self::Starting => "starting",
            Self::Running => "running",
            Self::Stopping => "stopping",
            Self::Stopped => "stopped",
            Self::FailedToStart => "failed to start",
        };
        formatter.write_str(label)
    }
}

/// One live protocol connection to a running server process.
pub struct Session {
    connection: Box<dyn ServerConnection>,
    selector: DocumentSelector,
    identity: Option<ServerIdentity>,
}

impl Session {
    fn new(
        connection: Box<dyn ServerConnection>,
        selector: DocumentSelector,
        identity: Option<ServerIdentity>,
    ) -> Self {
        Self {
            connection,
            selector,
            identity,
        }
    }

    /// Scoping rule the session registered with the editor.
    #[must_use]
    pub fn selector(&self) -> &DocumentSelector {
        &self.selector
    }

    /// Identity the server advertised during the handshake, when any.
    #[must_use]
    pub fn server_identity(&self) -> Option<&ServerIdentity> {
        self.identity.as_ref()
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Session")
            .field("selector", &self.selector)
            .field("identity", &self.identity)
            .finish_non_exhaustive()
    }
}

/// Owns the single session and drives it through its lifecycle.
///
/// Constructed once when the editor instantiates the extension; the session
/// reference lives here as an owned field rather than in module-level state.
/// `activate` and `deactivate` match the editor's activation contract:
/// activation runs the full spawn-and-handshake sequence and reports
/// failures both to the user and to the caller, while deactivation is
/// best-effort and never fails.
pub struct SessionLifecycle {
    launcher: Box<dyn ServerLauncher>,
    notifier: Box<dyn UserNotifier>,
    state: LifecycleState,
    session: Option<Session>,
}

impl SessionLifecycle {
    /// Builds a manager around the given launcher and notifier.
    #[must_use]
    pub fn new(launcher: Box<dyn ServerLauncher>, notifier: Box<dyn UserNotifier>) -> Self {
        Self {
            launcher,
            notifier,
            state: LifecycleState::Unstarted,
            session: None,
        }
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// The live session, when one exists.
    #[must_use]
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Whether a session is currently live.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state == LifecycleState::Running
    }

    /// Starts the session from a fresh settings snapshot.
    ///
    /// Resolves the launch spec, spawns the server from the run channel and
    /// completes the `initialize`/`initialized` handshake with the settings
    /// forwarded verbatim as initialisation options. Returns once the
    /// handshake has completed or failed; a failure is surfaced to the user
    /// through the notifier and re-raised to the caller so the editor marks
    /// the activation as failed. There is no retry.
    ///
    /// # Errors
    ///
    /// Returns the spawn or handshake failure, or
    /// [`SessionError::AlreadyActivated`] when activation already happened.
    pub fn activate(&mut self, settings: &ClientSettings) -> Result<(), SessionError> {
        self.activate_via(settings, LaunchChannel::Run)
    }

    /// [`SessionLifecycle::activate`] through an explicit launch channel.
    ///
    /// Both channels resolve to the same spec in this design; the choice
    /// only matters to hosts that distinguish debug launches.
    ///
    /// # Errors
    ///
    /// As for [`SessionLifecycle::activate`].
    pub fn activate_via(
        &mut self,
        settings: &ClientSettings,
        channel: LaunchChannel,
    ) -> Result<(), SessionError> {
        if self.state != LifecycleState::Unstarted {
            return Err(SessionError::AlreadyActivated);
        }

        self.set_state(LifecycleState::Starting);
        match self.start_session(settings, channel) {
            Ok(session) => {
                self.session = Some(session);
                self.set_state(LifecycleState::Running);
                Ok(())
            }
            Err(error) => {
                self.session = None;
                self.set_state(LifecycleState::FailedToStart);
                self.notifier
                    .show_error(&format!("Failed to activate {CLIENT_NAME}: {error}"));
                Err(error)
            }
        }
    }

    /// Stops the session, completing without error in every case.
    ///
    /// With no live session this returns immediately. Otherwise the server
    /// receives `shutdown` and `exit`, then the process is terminated if it
    /// lingers. Every stop error is swallowed after the best-effort attempt:
    /// editor teardown must never hang on a misbehaving server.
    pub fn deactivate(&mut self) {
        let Some(mut session) = self.session.take() else {
            debug!(target: LOG_TARGET, "deactivate without a live session is a no-op");
            return;
        };

        self.set_state(LifecycleState::Stopping);
        if let Err(error) = session.connection.shutdown() {
            debug!(target: LOG_TARGET, error = %error, "shutdown request failed");
        }
        if let Err(error) = session.connection.exit() {
            debug!(target: LOG_TARGET, error = %error, "exit notification failed");
        }
        session.connection.terminate();
        self.set_state(LifecycleState::Stopped);
    }

    fn start_session(
        &mut self,
        settings: &ClientSettings,
        channel: LaunchChannel,
    ) -> Result<Session, SessionError> {
        let options = ServerOptions::resolve(settings);
        let payload = settings.initialization_payload();

        let mut connection = self.launcher.launch(options.channel(channel))?;
        let result = connection.initialize(initialize_params(payload))?;
        connection.initialized()?;

        let identity = result.server_info.map(ServerIdentity::from);
        if let Some(identity) = &identity {
            debug!(
                target: LOG_TARGET,
                name = identity.name(),
                version = identity.version().unwrap_or("unknown"),
                "language server ready"
            );
        }

        Ok(Session::new(
            connection,
            DocumentSelector::yag_templates(),
            identity,
        ))
    }

    fn set_state(&mut self, next: LifecycleState) {
        debug!(target: LOG_TARGET, from = %self.state, to = %next, "session state change");
        self.state = next;
    }
}

impl fmt::Debug for SessionLifecycle {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("SessionLifecycle")
            .field("state", &self.state)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

/// Builds the `initialize` request parameters.
///
/// The client advertises document-synchronisation support, identifies
/// itself, and forwards the settings payload untouched; everything else
/// stays at protocol defaults.
fn initialize_params(payload: Value) -> InitializeParams {
    InitializeParams {
        process_id: Some(std::process::id()),
        capabilities: ClientCapabilities {
            text_document: Some(TextDocumentClientCapabilities {
                synchronization: Some(TextDocumentSyncClientCapabilities::default()),
                ..Default::default()
            }),
            ..Default::default()
        },
        client_info: Some(ClientInfo {
            name: CLIENT_NAME.to_owned(),
            version: Some(env!("CARGO_PKG_VERSION").to_owned()),
        }),
        initialization_options: Some(payload),
        ..Default::default()
    }
}
