//! Executable and environment resolution for server launches.

use std::collections::BTreeMap;
use std::env;

use camino::{Utf8Path, Utf8PathBuf};

use crate::settings::ClientSettings;

/// File name of the language server bundled alongside the client.
pub const BUNDLED_SERVER_BASENAME: &str = "yag-template-lsp";

/// Suffix appended to the bundled executable name on Windows hosts.
const WINDOWS_EXECUTABLE_SUFFIX: &str = ".exe";

/// Environment variable forced into every server launch so start failures
/// carry a usable backtrace.
pub const BACKTRACE_ENV_VAR: &str = "RUST_BACKTRACE";

/// Value assigned to [`BACKTRACE_ENV_VAR`].
pub const BACKTRACE_ENV_VALUE: &str = "1";

/// Host operating-system family, reduced to the two cases executable naming
/// actually distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostOs {
    /// Windows hosts, where executables carry the `.exe` suffix.
    Windows,
    /// Every other host family.
    Other,
}

impl HostOs {
    /// Family of the running host.
    #[must_use]
    pub const fn current() -> Self {
        if cfg!(windows) {
            Self::Windows
        } else {
            Self::Other
        }
    }

    const fn executable_suffix(self) -> &'static str {
        match self {
            Self::Windows => WINDOWS_EXECUTABLE_SUFFIX,
            Self::Other => "",
        }
    }
}

/// Returns the bundled server's executable name for the host family.
#[must_use]
pub fn bundled_server_name(host: HostOs) -> Utf8PathBuf {
    Utf8PathBuf::from(format!(
        "{BUNDLED_SERVER_BASENAME}{}",
        host.executable_suffix()
    ))
}

/// Resolves the executable to spawn.
///
/// A non-empty `serverPath` override wins and passes through unchanged — no
/// existence check happens here, so a stale override surfaces as a spawn
/// failure at session start, not as a resolution error. Without an override
/// the bundled server name is used, suffixed per host family.
#[must_use]
pub fn resolve_executable(settings: &ClientSettings, host: HostOs) -> Utf8PathBuf {
    settings
        .server_path()
        .map(Utf8Path::to_path_buf)
        .unwrap_or_else(|| bundled_server_name(host))
}

/// Composes the environment for the server process.
///
/// Starts from the supplied ambient environment (the server must see
/// everything the editor process sees — `PATH`, locale, and so on), overlays
/// the user's `extraEnv` entries, then forces [`BACKTRACE_ENV_VAR`]. Later
/// writes win, so precedence is: backtrace flag, then user overrides, then
/// ambient values.
#[must_use]
pub fn resolve_environment<I>(ambient: I, settings: &ClientSettings) -> BTreeMap<String, String>
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut environment: BTreeMap<String, String> = ambient.into_iter().collect();
    for (key, value) in settings.extra_env() {
        environment.insert(key.clone(), value.clone());
    }
    environment.insert(BACKTRACE_ENV_VAR.to_owned(), BACKTRACE_ENV_VALUE.to_owned());
    environment
}

/// Fully resolved executable-plus-environment pair for one server launch.
///
/// Built once per activation and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchSpec {
    executable: Utf8PathBuf,
    environment: BTreeMap<String, String>,
}

impl LaunchSpec {
    /// Resolves a launch spec against the live host: current OS family and
    /// the editor process's own environment.
    #[must_use]
    pub fn resolve(settings: &ClientSettings) -> Self {
        Self::resolve_on(settings, HostOs::current(), ambient_environment())
    }

    /// Deterministic variant of [`LaunchSpec::resolve`] for callers that
    /// supply the host family and ambient environment explicitly.
    #[must_use]
    pub fn resolve_on<I>(settings: &ClientSettings, host: HostOs, ambient: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Self {
            executable: resolve_executable(settings, host),
            environment: resolve_environment(ambient, settings),
        }
    }

    /// Executable the session layer spawns, argument-free.
    #[must_use]
    pub fn executable(&self) -> &Utf8Path {
        self.executable.as_path()
    }

    /// Complete environment for the spawned process.
    #[must_use]
    pub fn environment(&self) -> &BTreeMap<String, String> {
        &self.environment
    }
}

/// Ambient environment of the editor process, skipping entries that are not
/// valid UTF-8 (the settings overlay cannot express them either way).
fn ambient_environment() -> impl Iterator<Item = (String, String)> {
    env::vars_os()
        .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
}

/// Logical launch channel requested by the host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LaunchChannel {
    /// Ordinary launch.
    #[default]
    Run,
    /// Launch under a debugger attached to the editor.
    Debug,
}

/// The run and debug launch channels handed to the session layer.
///
/// Both channels reuse the same spec: the server needs no additional flags
/// when the editor runs it for debugging.
#[derive(Debug, Clone)]
pub struct ServerOptions {
    run: LaunchSpec,
    debug: LaunchSpec,
}

impl ServerOptions {
    /// Builds both channels from a single resolved spec.
    #[must_use]
    pub fn from_spec(spec: LaunchSpec) -> Self {
        Self {
            debug: spec.clone(),
            run: spec,
        }
    }

    /// Resolves both channels from the settings snapshot.
    #[must_use]
    pub fn resolve(settings: &ClientSettings) -> Self {
        Self::from_spec(LaunchSpec::resolve(settings))
    }

    /// Spec for the requested channel.
    #[must_use]
    pub fn channel(&self, channel: LaunchChannel) -> &LaunchSpec {
        match channel {
            LaunchChannel::Run => &self.run,
            LaunchChannel::Debug => &self.debug,
        }
    }

    /// Spec used for ordinary launches.
    #[must_use]
    pub fn run(&self) -> &LaunchSpec {
        &self.run
    }

    /// Spec used for debug launches.
    #[must_use]
    pub fn debug(&self) -> &LaunchSpec {
        &self.debug
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    fn settings(raw: serde_json::Value) -> ClientSettings {
        ClientSettings::from_value(raw)
    }

    #[rstest]
    #[case(HostOs::Windows)]
    #[case(HostOs::Other)]
    fn override_wins_on_every_host(#[case] host: HostOs) {
        let configured = settings(json!({"serverPath": "/custom/server"}));

        assert_eq!(
            resolve_executable(&configured, host),
            Utf8PathBuf::from("/custom/server")
        );
    }

    #[rstest]
    #[case(HostOs::Windows, "yag-template-lsp.exe")]
    #[case(HostOs::Other, "yag-template-lsp")]
    fn bundled_name_is_suffixed_per_host(#[case] host: HostOs, #[case] expected: &str) {
        let configured = settings(json!({}));

        assert_eq!(
            resolve_executable(&configured, host),
            Utf8PathBuf::from(expected)
        );
    }

    #[rstest]
    fn user_overlay_beats_ambient() {
        let configured = settings(json!({"extraEnv": {"PATH": "/overridden"}}));
        let ambient = vec![
            ("PATH".to_owned(), "/usr/bin".to_owned()),
            ("LANG".to_owned(), "C.UTF-8".to_owned()),
        ];

        let environment = resolve_environment(ambient, &configured);

        assert_eq!(environment.get("PATH").map(String::as_str), Some("/overridden"));
        assert_eq!(environment.get("LANG").map(String::as_str), Some("C.UTF-8"));
    }

    #[rstest]
    fn backtrace_flag_beats_user_overlay() {
        let configured = settings(json!({"extraEnv": {"RUST_BACKTRACE": "full"}}));

        let environment = resolve_environment(Vec::new(), &configured);

        assert_eq!(
            environment.get(BACKTRACE_ENV_VAR).map(String::as_str),
            Some(BACKTRACE_ENV_VALUE)
        );
    }

    #[rstest]
    fn backtrace_flag_is_always_present() {
        let environment = resolve_environment(Vec::new(), &settings(json!({})));

        assert_eq!(
            environment.get(BACKTRACE_ENV_VAR).map(String::as_str),
            Some(BACKTRACE_ENV_VALUE)
        );
    }

    #[rstest]
    fn both_channels_reuse_the_same_spec() {
        let spec = LaunchSpec::resolve_on(&settings(json!({})), HostOs::Other, Vec::new());
        let options = ServerOptions::from_spec(spec.clone());

        assert_eq!(options.run(), &spec);
        assert_eq!(options.debug(), options.run());
        assert_eq!(options.channel(LaunchChannel::Debug), options.run());
    }
}
