//! Error type for harness commands.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use yag_client_session::SessionError;

/// Errors raised while executing a harness command.
#[derive(Debug, Error)]
pub enum CliError {
    /// The settings file could not be read.
    #[error("failed to read settings file '{path}': {source}", path = .path.display())]
    ReadSettings {
        /// Path that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The settings file held invalid JSON.
    #[error("settings file '{path}' is not valid JSON: {source}", path = .path.display())]
    ParseSettings {
        /// Path holding the invalid snapshot.
        path: PathBuf,
        /// The underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// The session failed to start.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// Writing command output failed.
    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),
}
