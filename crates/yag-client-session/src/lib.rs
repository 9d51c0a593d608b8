//! Session bootstrap and lifecycle for the YAG template language client.
#![deny(missing_docs)]
//!
//! The crate owns the single protocol session between an editor embedding
//! and the external `yag-template-lsp` process: it spawns the server from a
//! resolved [`LaunchSpec`](yag_client_config::LaunchSpec), runs the LSP
//! `initialize`/`initialized` handshake with the editor's settings forwarded
//! as initialisation options, and drives the shutdown/exit/terminate
//! sequence on deactivation. Process and wire details sit behind the
//! [`ServerLauncher`] and [`ServerConnection`] traits so tests and
//! non-spawning hosts can inject lightweight implementations.

mod connection;
mod error;
mod jsonrpc;
mod notify;
mod process;
mod selector;
mod session;
#[cfg(test)]
mod tests;
mod transport;

pub use connection::{ServerConnection, ServerIdentity, ServerLauncher};
pub use error::{SessionError, TransportError};
pub use jsonrpc::{
    JsonRpcError, JsonRpcMessage, JsonRpcNotification, JsonRpcRequest, JsonRpcResponse,
    JsonRpcServerNotification, JsonRpcServerRequest,
};
pub use notify::{LogNotifier, UserNotifier};
pub use process::ProcessLauncher;
pub use selector::{DOCUMENT_SCHEME, DocumentSelector, LANGUAGE_ID};
pub use session::{CLIENT_NAME, LifecycleState, Session, SessionLifecycle};
pub use transport::{FramedTransport, StdioTransport};

/// Log target for session operations.
pub(crate) const LOG_TARGET: &str = "yag_client_session";
