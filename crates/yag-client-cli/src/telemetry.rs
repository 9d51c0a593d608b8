//! Telemetry initialisation for the harness binary.

use std::io::{self, IsTerminal};

use once_cell::sync::OnceCell;
use tracing_subscriber::EnvFilter;

static TELEMETRY_GUARD: OnceCell<()> = OnceCell::new();

/// Installs the global tracing subscriber on first use.
///
/// Repeated calls are idempotent. Logs go to stderr so the session's stdout
/// output stays clean, with ANSI colour only on interactive terminals. The
/// filter honours `RUST_LOG` and defaults to `info`.
pub(crate) fn initialise() {
    TELEMETRY_GUARD.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .with_ansi(io::stderr().is_terminal())
            .compact()
            .finish();
        // A second subscriber registration (e.g. in tests) is not an error
        // worth failing the command over.
        let _ = tracing::subscriber::set_global_default(subscriber);
    });
}
