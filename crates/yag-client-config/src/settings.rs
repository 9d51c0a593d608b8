//! Snapshot of the editor settings relevant to one activation.

use std::collections::BTreeMap;

use camino::{Utf8Path, Utf8PathBuf};
use serde_json::Value;

/// Settings namespace the editor stores client configuration under.
pub const SETTINGS_NAMESPACE: &str = "yag-template";

/// Key holding the explicit server executable override.
const SERVER_PATH_KEY: &str = "serverPath";

/// Key holding the extra-environment mapping.
const EXTRA_ENV_KEY: &str = "extraEnv";

/// Point-in-time copy of the `yag-template` settings namespace.
///
/// A snapshot is taken fresh on every activation; nothing is cached across
/// activations. The raw settings object is retained verbatim so it can be
/// forwarded to the server as `initializationOptions` — the server owns the
/// interpretation of everything in it, and the client imposes no schema.
#[derive(Debug, Clone, Default)]
pub struct ClientSettings {
    raw: Value,
    server_path: Option<Utf8PathBuf>,
    extra_env: BTreeMap<String, String>,
}

impl ClientSettings {
    /// Builds a snapshot from the raw settings object.
    ///
    /// Extraction is deliberately forgiving: a missing or mistyped
    /// `serverPath` or `extraEnv` degrades to "absent" rather than failing,
    /// and an empty override string counts as no override at all. Keys the
    /// client does not recognise stay untouched in the raw object.
    #[must_use]
    pub fn from_value(raw: Value) -> Self {
        let server_path = raw
            .get(SERVER_PATH_KEY)
            .and_then(Value::as_str)
            .filter(|path| !path.is_empty())
            .map(Utf8PathBuf::from);
        let extra_env = raw
            .get(EXTRA_ENV_KEY)
            .and_then(Value::as_object)
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(|(key, value)| {
                        value.as_str().map(|text| (key.clone(), text.to_owned()))
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            raw,
            server_path,
            extra_env,
        }
    }

    /// Explicit server executable override, when one is configured.
    #[must_use]
    pub fn server_path(&self) -> Option<&Utf8Path> {
        self.server_path.as_deref()
    }

    /// Extra environment entries layered over the ambient environment.
    #[must_use]
    pub fn extra_env(&self) -> &BTreeMap<String, String> {
        &self.extra_env
    }

    /// The full settings object, forwarded verbatim as
    /// `initializationOptions` during the handshake.
    #[must_use]
    pub fn initialization_payload(&self) -> Value {
        self.raw.clone()
    }
}
