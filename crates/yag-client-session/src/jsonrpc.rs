//! JSON-RPC 2.0 message types for the LSP wire.

use std::sync::atomic::{AtomicI64, Ordering};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Thread-safe request id generator.
static REQUEST_ID: AtomicI64 = AtomicI64::new(1);

/// Allocates a unique, monotonically increasing request id.
#[must_use]
pub fn next_request_id() -> i64 {
    REQUEST_ID.fetch_add(1, Ordering::SeqCst)
}

/// A JSON-RPC 2.0 request message.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcRequest {
    /// Protocol version, always "2.0".
    pub jsonrpc: &'static str,
    /// Unique request identifier.
    pub id: i64,
    /// The method to invoke.
    pub method: String,
    /// Optional parameters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl JsonRpcRequest {
    /// Creates a request with an auto-generated id.
    #[must_use]
    pub fn new(method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            jsonrpc: "2.0",
            id: next_request_id(),
            method: method.into(),
            params,
        }
    }
}

/// A JSON-RPC 2.0 notification (no response expected).
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcNotification {
    /// Protocol version, always "2.0".
    pub jsonrpc: &'static str,
    /// The method to invoke.
    pub method: String,
    /// Optional parameters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl JsonRpcNotification {
    /// Creates a notification.
    #[must_use]
    pub fn new(method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            jsonrpc: "2.0",
            method: method.into(),
            params,
        }
    }
}

/// A JSON-RPC 2.0 response message.
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcResponse {
    /// Protocol version.
    pub jsonrpc: String,
    /// Request identifier this response corresponds to.
    pub id: Option<i64>,
    /// The result on success.
    #[serde(default)]
    pub result: Option<Value>,
    /// The error on failure.
    #[serde(default)]
    pub error: Option<JsonRpcError>,
}

/// A JSON-RPC 2.0 error object.
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcError {
    /// Error code.
    pub code: i64,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional data.
    #[serde(default)]
    pub data: Option<Value>,
}

/// A request initiated by the server.
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcServerRequest {
    /// Request identifier chosen by the server.
    pub id: i64,
    /// The method the server wants handled.
    pub method: String,
    /// Optional parameters.
    #[serde(default)]
    pub params: Option<Value>,
}

/// A notification initiated by the server.
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcServerNotification {
    /// The notification method.
    pub method: String,
    /// Optional parameters.
    #[serde(default)]
    pub params: Option<Value>,
}

/// An incoming message, classified by shape.
///
/// A payload carrying both `method` and `id` is a server-initiated request;
/// `method` alone marks a notification; everything else is a response to one
/// of our requests.
#[derive(Debug, Clone)]
pub enum JsonRpcMessage {
    /// Response to a client request.
    Response(JsonRpcResponse),
    /// Request initiated by the server.
    ServerRequest(JsonRpcServerRequest),
    /// Notification initiated by the server.
    Notification(JsonRpcServerNotification),
}

impl JsonRpcMessage {
    /// Classifies a raw payload received from the transport.
    ///
    /// # Errors
    ///
    /// Returns a codec error when the payload is not valid JSON or does not
    /// match the shape its discriminating fields promise.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_slice(bytes)?;
        if value.get("method").is_some() {
            if value.get("id").is_some() {
                Ok(Self::ServerRequest(serde_json::from_value(value)?))
            } else {
                Ok(Self::Notification(serde_json::from_value(value)?))
            }
        } else {
            Ok(Self::Response(serde_json::from_value(value)?))
        }
    }
}
