//! CLI entrypoint for the YAG template client harness.
//!
//! The binary delegates to [`yag_client_cli::run`], which parses arguments,
//! installs telemetry, and drives the session lifecycle.

use std::io::{self, StderrLock, StdoutLock};
use std::process::ExitCode;

fn main() -> ExitCode {
    let mut stdout: StdoutLock<'_> = io::stdout().lock();
    let mut stderr: StderrLock<'_> = io::stderr().lock();
    yag_client_cli::run(std::env::args_os(), &mut stdout, &mut stderr)
}
