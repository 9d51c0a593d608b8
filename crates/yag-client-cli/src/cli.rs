//! Command-line surface for the harness.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Bootstrap harness for the YAG template language server.
#[derive(Debug, Parser)]
#[command(name = "yag-client", version, about)]
pub struct Cli {
    /// Path to a JSON settings snapshot (the `yag-template` namespace).
    #[arg(long, global = true, value_name = "FILE")]
    pub settings: Option<PathBuf>,

    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Harness commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Resolve and report the launch spec without spawning anything.
    Check,
    /// Activate a session and hold it until stdin reaches end-of-file.
    Run {
        /// Launch through the debug channel instead of the run channel.
        #[arg(long)]
        debug: bool,
    },
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use rstest::rstest;

    use super::*;

    #[rstest]
    fn parses_check_with_settings_file() {
        let cli = Cli::try_parse_from(["yag-client", "--settings", "conf.json", "check"])
            .expect("parse failed");

        assert!(matches!(cli.command, Command::Check));
        assert_eq!(cli.settings.as_deref(), Some(Path::new("conf.json")));
    }

    #[rstest]
    fn settings_flag_is_accepted_after_the_subcommand() {
        let cli = Cli::try_parse_from(["yag-client", "check", "--settings", "conf.json"])
            .expect("parse failed");

        assert_eq!(cli.settings.as_deref(), Some(Path::new("conf.json")));
    }

    #[rstest]
    fn parses_run_with_debug_channel() {
        let cli = Cli::try_parse_from(["yag-client", "run", "--debug"]).expect("parse failed");

        assert!(matches!(cli.command, Command::Run { debug: true }));
    }

    #[rstest]
    fn rejects_unknown_subcommands() {
        assert!(Cli::try_parse_from(["yag-client", "restart"]).is_err());
    }
}
