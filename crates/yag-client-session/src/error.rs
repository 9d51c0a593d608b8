//! Error types raised while starting, driving, and stopping the session.

use std::io;

use thiserror::Error;

use crate::jsonrpc::JsonRpcError;

/// Errors surfaced by session start and protocol traffic.
///
/// Stop-side failures never reach callers: `deactivate` swallows them after
/// a best-effort termination attempt, so none of these variants escape that
/// path.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The configured or bundled server executable was not found.
    #[error("language server executable not found: {command}")]
    BinaryNotFound {
        /// The executable that could not be found.
        command: String,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Spawning the server process failed for a reason other than a missing
    /// executable.
    #[error("failed to spawn language server: {message}")]
    SpawnFailed {
        /// Description of the spawn failure.
        message: String,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Transport-level I/O failure.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// JSON encoding or decoding failure.
    #[error("JSON codec error: {0}")]
    Codec(#[from] serde_json::Error),

    /// The server answered a request with an error.
    #[error("server returned error: {message} (code: {code})")]
    ServerError {
        /// The JSON-RPC error code.
        code: i64,
        /// The error message from the server.
        message: String,
    },

    /// The `initialize` handshake did not complete.
    #[error("initialisation handshake failed: {message}")]
    HandshakeFailed {
        /// Description of the handshake failure.
        message: String,
    },

    /// No response with the expected id arrived within the bounded scan of
    /// interleaved server traffic.
    #[error("no response received for request {request_id}")]
    UnmatchedResponse {
        /// Id of the request left without a response.
        request_id: i64,
    },

    /// `activate` was called more than once.
    ///
    /// The editor's activation contract calls `activate` once per process;
    /// this variant keeps the API total instead of leaving the sequence
    /// undefined.
    #[error("activation has already been attempted; the client activates once per editor process")]
    AlreadyActivated,
}

impl SessionError {
    /// Converts a JSON-RPC error object into a session error.
    #[must_use]
    pub fn from_jsonrpc(error: JsonRpcError) -> Self {
        Self::ServerError {
            code: error.code,
            message: error.message,
        }
    }
}

/// Transport-layer errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// I/O error during read or write.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Missing `Content-Length` header.
    #[error("missing Content-Length header")]
    MissingContentLength,

    /// Malformed header line.
    #[error("invalid header format")]
    InvalidHeader,
}
