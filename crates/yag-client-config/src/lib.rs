//! Launch configuration for the YAG template language client.
#![deny(missing_docs)]
//!
//! The crate turns the editor's `yag-template` settings namespace into a
//! fully resolved launch specification: which executable to spawn, the
//! environment the server process sees, and the opaque settings payload the
//! server receives during initialisation. Resolution is total — every
//! operation succeeds for any settings value — so misconfiguration surfaces
//! as a spawn failure in the session layer, never as an error here.

mod launch;
mod settings;

pub use launch::{
    BACKTRACE_ENV_VALUE, BACKTRACE_ENV_VAR, BUNDLED_SERVER_BASENAME, HostOs, LaunchChannel,
    LaunchSpec, ServerOptions, bundled_server_name, resolve_environment, resolve_executable,
};
pub use settings::{ClientSettings, SETTINGS_NAMESPACE};
