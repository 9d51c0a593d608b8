//! Process-backed server connection.

use std::io;
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::Duration;

use lsp_types::{InitializeParams, InitializeResult, InitializedParams};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::LOG_TARGET;
use crate::connection::{ServerConnection, ServerLauncher};
use crate::error::SessionError;
use crate::jsonrpc::{JsonRpcMessage, JsonRpcNotification, JsonRpcRequest, JsonRpcResponse};
use crate::transport::StdioTransport;
use yag_client_config::LaunchSpec;

/// How long a stopping server gets to exit before being killed.
const SHUTDOWN_GRACE_PERIOD: Duration = Duration::from_millis(200);

/// Maximum number of interleaved messages scanned while awaiting a response.
const MAX_RESPONSE_ITERATIONS: usize = 100;

/// Launcher that spawns the real server process.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessLauncher;

impl ServerLauncher for ProcessLauncher {
    fn launch(&self, spec: &LaunchSpec) -> Result<Box<dyn ServerConnection>, SessionError> {
        debug!(
            target: LOG_TARGET,
            command = %spec.executable(),
            "spawning language server process"
        );

        let mut command = Command::new(spec.executable().as_std_path());
        command
            .env_clear()
            .envs(spec.environment())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            // Stderr stays attached to the host so the backtraces forced by
            // the resolved environment end up in its log.
            .stderr(Stdio::inherit());

        let mut child = command.spawn().map_err(|error| {
            if error.kind() == io::ErrorKind::NotFound {
                SessionError::BinaryNotFound {
                    command: spec.executable().to_string(),
                    source: error,
                }
            } else {
                SessionError::SpawnFailed {
                    message: format!("failed to start {}", spec.executable()),
                    source: error,
                }
            }
        })?;

        let stdin = child.stdin.take().ok_or_else(|| SessionError::SpawnFailed {
            message: "failed to capture stdin".to_owned(),
            source: io::Error::other("no stdin"),
        })?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| SessionError::SpawnFailed {
                message: "failed to capture stdout".to_owned(),
                source: io::Error::other("no stdout"),
            })?;

        debug!(
            target: LOG_TARGET,
            pid = child.id(),
            "language server process spawned"
        );

        Ok(Box::new(ProcessConnection {
            child,
            transport: StdioTransport::from_child_io(stdout, stdin),
        }))
    }
}

/// Live connection to a spawned server process.
pub(crate) struct ProcessConnection {
    child: Child,
    transport: StdioTransport,
}

impl ProcessConnection {
    /// Sends a request and returns the raw response once it arrives.
    fn send_request_raw<P>(&mut self, method: &str, params: P) -> Result<JsonRpcResponse, SessionError>
    where
        P: Serialize,
    {
        let params_value = serde_json::to_value(params)?;
        let request = JsonRpcRequest::new(method, Some(params_value));
        let request_id = request.id;
        let payload = serde_json::to_vec(&request)?;

        debug!(target: LOG_TARGET, method, id = request_id, "sending request");

        self.transport.send(&payload)?;
        let response = self.receive_response_for_request(request_id)?;

        if let Some(error) = response.error {
            return Err(SessionError::from_jsonrpc(error));
        }

        Ok(response)
    }

    /// Sends a request and decodes its result.
    fn send_request<P, R>(&mut self, method: &str, params: P) -> Result<R, SessionError>
    where
        P: Serialize,
        R: DeserializeOwned,
    {
        let response = self.send_request_raw(method, params)?;
        let result = response
            .result
            .ok_or_else(|| SessionError::HandshakeFailed {
                message: format!("empty result in response to {method}"),
            })?;
        serde_json::from_value(result).map_err(SessionError::from)
    }

    /// Sends a notification (no response expected).
    fn send_notification<P>(&mut self, method: &str, params: P) -> Result<(), SessionError>
    where
        P: Serialize,
    {
        let params_value = serde_json::to_value(params)?;
        let notification = JsonRpcNotification::new(method, Some(params_value));
        let payload = serde_json::to_vec(&notification)?;

        debug!(target: LOG_TARGET, method, "sending notification");

        self.transport.send(&payload)?;
        Ok(())
    }

    /// Reads messages until the response with the given id arrives.
    ///
    /// Interleaved server traffic (notifications and server-initiated
    /// requests) is skipped. A bounded iteration count prevents waiting
    /// forever on a server that never answers.
    fn receive_response_for_request(
        &mut self,
        request_id: i64,
    ) -> Result<JsonRpcResponse, SessionError> {
        for _ in 0..MAX_RESPONSE_ITERATIONS {
            let message_bytes = self.transport.receive()?;

            match JsonRpcMessage::from_bytes(&message_bytes)? {
                JsonRpcMessage::Response(response) => {
                    if response.id == Some(request_id) {
                        return Ok(response);
                    }
                    warn!(
                        target: LOG_TARGET,
                        expected = request_id,
                        received = ?response.id,
                        "skipping response with non-matching id"
                    );
                }
                JsonRpcMessage::ServerRequest(request) => {
                    warn!(
                        target: LOG_TARGET,
                        method = %request.method,
                        id = request.id,
                        "ignoring server-initiated request during bootstrap"
                    );
                }
                JsonRpcMessage::Notification(notification) => {
                    debug!(
                        target: LOG_TARGET,
                        method = %notification.method,
                        "skipping server notification"
                    );
                }
            }
        }

        warn!(
            target: LOG_TARGET,
            request_id,
            max_iterations = MAX_RESPONSE_ITERATIONS,
            "giving up on response after reaching maximum iterations"
        );
        Err(SessionError::UnmatchedResponse { request_id })
    }

    /// Waits briefly for the child to exit, then kills it.
    fn reap_child(&mut self) {
        match self.child.try_wait() {
            Ok(Some(status)) => {
                debug!(target: LOG_TARGET, ?status, "language server exited");
            }
            Ok(None) => {
                warn!(
                    target: LOG_TARGET,
                    "language server still running, waiting before killing"
                );
                self.kill_after_grace_period();
            }
            Err(error) => {
                warn!(
                    target: LOG_TARGET,
                    error = %error,
                    "failed to check process status, waiting before killing"
                );
                self.kill_after_grace_period();
            }
        }
    }

    fn kill_after_grace_period(&mut self) {
        thread::sleep(SHUTDOWN_GRACE_PERIOD);
        match self.child.try_wait() {
            Ok(Some(status)) => {
                debug!(
                    target: LOG_TARGET,
                    ?status,
                    "language server exited during grace period"
                );
            }
            Ok(None) | Err(_) => {
                let _ = self.child.kill();
                let _ = self.child.wait();
            }
        }
    }
}

impl ServerConnection for ProcessConnection {
    fn initialize(&mut self, params: InitializeParams) -> Result<InitializeResult, SessionError> {
        self.send_request("initialize", params)
    }

    fn initialized(&mut self) -> Result<(), SessionError> {
        self.send_notification("initialized", InitializedParams {})
    }

    fn shutdown(&mut self) -> Result<(), SessionError> {
        // The shutdown result is null by contract; only the error matters.
        self.send_request_raw("shutdown", ()).map(|_| ())
    }

    fn exit(&mut self) -> Result<(), SessionError> {
        self.send_notification("exit", ())
    }

    fn terminate(&mut self) {
        self.reap_child();
    }
}

impl Drop for ProcessConnection {
    fn drop(&mut self) {
        // A dropped connection must not leave the server running, e.g. when
        // the handshake fails after a successful spawn.
        if let Ok(None) = self.child.try_wait() {
            if let Err(error) = self.child.kill() {
                warn!(
                    target: LOG_TARGET,
                    error = %error,
                    "failed to kill language server process on drop"
                );
            } else {
                let _ = self.child.wait();
            }
        }
    }
}
