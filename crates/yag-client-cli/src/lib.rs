//! Headless harness for the YAG template language client.
#![deny(missing_docs)]
//!
//! Drives the same activation contract an editor embedding would: resolve a
//! launch spec from a settings snapshot, activate the session, hold it until
//! stdin closes, then deactivate. The harness exists so the bootstrap can be
//! exercised end-to-end without an editor.

mod cli;
mod errors;
mod telemetry;

use std::ffi::OsString;
use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;
use std::process::ExitCode;

use clap::Parser;

pub use cli::{Cli, Command};
pub use errors::CliError;

use yag_client_config::{ClientSettings, LaunchChannel, ServerOptions};
use yag_client_session::{LogNotifier, ProcessLauncher, Session, SessionLifecycle};

/// Parses arguments and executes the selected command.
///
/// Output goes to the supplied handles so tests can capture it. The exit
/// code follows CLI convention: success, general failure, or usage error.
pub fn run<I, T, W, E>(arguments: I, stdout: &mut W, stderr: &mut E) -> ExitCode
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
    W: Write,
    E: Write,
{
    let cli = match Cli::try_parse_from(arguments) {
        Ok(cli) => cli,
        Err(error) => {
            let rendered = error.render();
            if error.use_stderr() {
                let _ = writeln!(stderr, "{rendered}");
                return ExitCode::from(2);
            }
            // Help and version requests land on stdout and succeed.
            let _ = writeln!(stdout, "{rendered}");
            return ExitCode::SUCCESS;
        }
    };

    telemetry::initialise();

    match execute(&cli, stdout) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            let _ = writeln!(stderr, "yag-client: {error}");
            ExitCode::FAILURE
        }
    }
}

fn execute<W: Write>(cli: &Cli, stdout: &mut W) -> Result<(), CliError> {
    let settings = load_settings(cli.settings.as_deref())?;
    match cli.command {
        Command::Check => check(&settings, stdout),
        Command::Run { debug } => run_session(&settings, debug, stdout),
    }
}

/// Reads the settings snapshot file, defaulting to empty settings when no
/// file was given.
fn load_settings(path: Option<&Path>) -> Result<ClientSettings, CliError> {
    let Some(path) = path else {
        return Ok(ClientSettings::default());
    };
    let text = fs::read_to_string(path).map_err(|source| CliError::ReadSettings {
        path: path.to_path_buf(),
        source,
    })?;
    let raw = serde_json::from_str(&text).map_err(|source| CliError::ParseSettings {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(ClientSettings::from_value(raw))
}

/// Reports the resolved launch spec without spawning anything.
fn check<W: Write>(settings: &ClientSettings, stdout: &mut W) -> Result<(), CliError> {
    let options = ServerOptions::resolve(settings);
    let spec = options.run();
    let source = if settings.server_path().is_some() {
        "serverPath override"
    } else {
        "bundled default"
    };

    writeln!(stdout, "executable: {} ({source})", spec.executable())?;
    writeln!(
        stdout,
        "environment entries: {} ({} from extraEnv)",
        spec.environment().len(),
        settings.extra_env().len()
    )?;
    writeln!(stdout, "run and debug channels share the launch spec")?;
    Ok(())
}

/// Activates a session and holds it until stdin reaches end-of-file.
fn run_session<W: Write>(
    settings: &ClientSettings,
    debug: bool,
    stdout: &mut W,
) -> Result<(), CliError> {
    let channel = if debug {
        LaunchChannel::Debug
    } else {
        LaunchChannel::Run
    };

    let mut lifecycle = SessionLifecycle::new(Box::new(ProcessLauncher), Box::new(LogNotifier));
    lifecycle.activate_via(settings, channel)?;

    if let Some(identity) = lifecycle.session().and_then(Session::server_identity) {
        writeln!(
            stdout,
            "connected to {} {}",
            identity.name(),
            identity.version().unwrap_or("unknown")
        )?;
    }
    writeln!(stdout, "session running; close stdin to stop")?;

    wait_for_stdin_eof();
    lifecycle.deactivate();
    writeln!(stdout, "session stopped")?;
    Ok(())
}

fn wait_for_stdin_eof() {
    let mut sink = Vec::new();
    let _ = io::stdin().lock().read_to_end(&mut sink);
}
