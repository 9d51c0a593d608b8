//! Abstractions over the live wire to a language server process.

use lsp_types::{InitializeParams, InitializeResult, ServerInfo};

use crate::error::SessionError;
use yag_client_config::LaunchSpec;

/// Identity advertised by the server during the handshake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerIdentity {
    name: String,
    version: Option<String>,
}

impl ServerIdentity {
    /// Server name reported in `serverInfo`.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Server version, when reported.
    #[must_use]
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }
}

impl From<ServerInfo> for ServerIdentity {
    fn from(info: ServerInfo) -> Self {
        Self {
            name: info.name,
            version: info.version,
        }
    }
}

/// Behaviour required from a live connection to the server.
///
/// The production implementation drives LSP-framed JSON-RPC over a spawned
/// child's stdio; tests substitute recording doubles.
pub trait ServerConnection: Send {
    /// Sends the `initialize` request and returns the server's response.
    fn initialize(&mut self, params: InitializeParams) -> Result<InitializeResult, SessionError>;

    /// Sends the `initialized` notification completing the handshake.
    fn initialized(&mut self) -> Result<(), SessionError>;

    /// Sends the `shutdown` request.
    fn shutdown(&mut self) -> Result<(), SessionError>;

    /// Sends the `exit` notification.
    fn exit(&mut self) -> Result<(), SessionError>;

    /// Reaps the server process, killing it after a grace period when it
    /// does not exit voluntarily. Infallible by design: stop must not fail.
    fn terminate(&mut self);
}

/// Launches server processes from a resolved launch spec.
pub trait ServerLauncher: Send {
    /// Spawns the server and returns the live connection to it.
    ///
    /// # Errors
    ///
    /// Returns a spawn-level [`SessionError`] when the process cannot be
    /// started.
    fn launch(&self, spec: &LaunchSpec) -> Result<Box<dyn ServerConnection>, SessionError>;
}
