//! Recording doubles for the launcher, connection, and notifier seams.

use std::io;
use std::sync::{Arc, Mutex};

use lsp_types::{InitializeParams, InitializeResult, ServerInfo};

use crate::connection::{ServerConnection, ServerLauncher};
use crate::error::{SessionError, TransportError};
use crate::notify::UserNotifier;
use yag_client_config::LaunchSpec;

/// Call observed by the recording doubles, in invocation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionCall {
    /// The launcher spawned a connection.
    Launch,
    /// `initialize` was sent.
    Initialize,
    /// `initialized` was sent.
    Initialized,
    /// `shutdown` was sent.
    Shutdown,
    /// `exit` was sent.
    Exit,
    /// The process was terminated.
    Terminate,
}

/// Failures injected into the recording doubles.
#[derive(Debug, Clone, Default)]
pub struct FailurePlan {
    /// Fail the launch with this message.
    pub launch: Option<String>,
    /// Fail the `initialize` request with this message.
    pub initialize: Option<String>,
    /// Fail the `shutdown` request with this message.
    pub shutdown: Option<String>,
    /// Fail the `exit` notification with this message.
    pub exit: Option<String>,
}

#[derive(Debug, Default)]
struct RecordingState {
    calls: Vec<ConnectionCall>,
    launch_specs: Vec<LaunchSpec>,
    initialize_params: Vec<InitializeParams>,
    plan: FailurePlan,
    server_info: Option<ServerInfo>,
}

fn with_state<R>(
    shared: &Arc<Mutex<RecordingState>>,
    action: impl FnOnce(&mut RecordingState) -> R,
) -> R {
    let mut guard = shared.lock().unwrap_or_else(|poison| poison.into_inner());
    action(&mut guard)
}

/// Launcher double that records launches and hands out recording
/// connections sharing the same call log.
#[derive(Clone, Default)]
pub struct RecordingLauncher {
    shared: Arc<Mutex<RecordingState>>,
}

impl RecordingLauncher {
    /// A launcher whose connections succeed at everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// A launcher whose doubles fail according to the plan.
    pub fn with_plan(plan: FailurePlan) -> Self {
        let launcher = Self::default();
        with_state(&launcher.shared, |state| state.plan = plan);
        launcher
    }

    /// A launcher whose connections advertise the given server identity.
    pub fn with_server_info(info: ServerInfo) -> Self {
        let launcher = Self::default();
        with_state(&launcher.shared, |state| state.server_info = Some(info));
        launcher
    }

    /// Handle for asserting on recorded interactions.
    pub fn handle(&self) -> RecordingHandle {
        RecordingHandle {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl ServerLauncher for RecordingLauncher {
    fn launch(&self, spec: &LaunchSpec) -> Result<Box<dyn ServerConnection>, SessionError> {
        with_state(&self.shared, |state| {
            state.calls.push(ConnectionCall::Launch);
            state.launch_specs.push(spec.clone());
            match &state.plan.launch {
                Some(message) => Err(SessionError::SpawnFailed {
                    message: message.clone(),
                    source: io::Error::new(io::ErrorKind::NotFound, message.clone()),
                }),
                None => Ok(()),
            }
        })?;

        Ok(Box::new(RecordingConnection {
            shared: Arc::clone(&self.shared),
        }))
    }
}

struct RecordingConnection {
    shared: Arc<Mutex<RecordingState>>,
}

impl ServerConnection for RecordingConnection {
    fn initialize(&mut self, params: InitializeParams) -> Result<InitializeResult, SessionError> {
        with_state(&self.shared, |state| {
            state.calls.push(ConnectionCall::Initialize);
            state.initialize_params.push(params);
            match &state.plan.initialize {
                Some(message) => Err(SessionError::HandshakeFailed {
                    message: message.clone(),
                }),
                None => Ok(InitializeResult {
                    server_info: state.server_info.clone(),
                    ..Default::default()
                }),
            }
        })
    }

    fn initialized(&mut self) -> Result<(), SessionError> {
        with_state(&self.shared, |state| {
            state.calls.push(ConnectionCall::Initialized);
            Ok(())
        })
    }

    fn shutdown(&mut self) -> Result<(), SessionError> {
        with_state(&self.shared, |state| {
            state.calls.push(ConnectionCall::Shutdown);
            match &state.plan.shutdown {
                Some(message) => Err(SessionError::ServerError {
                    code: -32603,
                    message: message.clone(),
                }),
                None => Ok(()),
            }
        })
    }

    fn exit(&mut self) -> Result<(), SessionError> {
        with_state(&self.shared, |state| {
            state.calls.push(ConnectionCall::Exit);
            match &state.plan.exit {
                Some(message) => Err(SessionError::Transport(TransportError::Io(
                    io::Error::other(message.clone()),
                ))),
                None => Ok(()),
            }
        })
    }

    fn terminate(&mut self) {
        with_state(&self.shared, |state| {
            state.calls.push(ConnectionCall::Terminate);
        });
    }
}

/// Handle exposing recorded interactions for assertions.
#[derive(Clone)]
pub struct RecordingHandle {
    shared: Arc<Mutex<RecordingState>>,
}

impl RecordingHandle {
    /// Ordered list of calls observed across launcher and connections.
    pub fn calls(&self) -> Vec<ConnectionCall> {
        with_state(&self.shared, |state| state.calls.clone())
    }

    /// Launch specs the launcher received.
    pub fn launch_specs(&self) -> Vec<LaunchSpec> {
        with_state(&self.shared, |state| state.launch_specs.clone())
    }

    /// `initialize` parameters the connections received.
    pub fn initialize_params(&self) -> Vec<InitializeParams> {
        with_state(&self.shared, |state| state.initialize_params.clone())
    }
}

/// Notifier double capturing every shown message.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    messages: Arc<Mutex<Vec<String>>>,
}

impl RecordingNotifier {
    /// A notifier with an empty message log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages shown so far, oldest first.
    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .unwrap_or_else(|poison| poison.into_inner())
            .clone()
    }
}

impl UserNotifier for RecordingNotifier {
    fn show_error(&self, message: &str) {
        self.messages
            .lock()
            .unwrap_or_else(|poison| poison.into_inner())
            .push(message.to_owned());
    }
}
