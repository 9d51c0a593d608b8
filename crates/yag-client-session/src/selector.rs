//! Document scoping for the session.

/// Language identifier this client exists to serve.
pub const LANGUAGE_ID: &str = "yag-template";

/// URI scheme of documents the session attaches to.
pub const DOCUMENT_SCHEME: &str = "file";

/// Scoping rule restricting which open documents the session receives
/// notifications about.
///
/// The rule is fixed when the session is constructed and never changes:
/// local-file documents whose declared language identifier is
/// [`LANGUAGE_ID`]. Enforcement happens in the editor's protocol machinery
/// during registration, not by filtering inside this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentSelector {
    scheme: &'static str,
    language_id: &'static str,
}

impl DocumentSelector {
    /// The one rule this client registers: local files declared as YAG
    /// templates.
    #[must_use]
    pub const fn yag_templates() -> Self {
        Self {
            scheme: DOCUMENT_SCHEME,
            language_id: LANGUAGE_ID,
        }
    }

    /// URI scheme the rule matches.
    #[must_use]
    pub const fn scheme(self) -> &'static str {
        self.scheme
    }

    /// Language identifier the rule matches.
    #[must_use]
    pub const fn language_id(self) -> &'static str {
        self.language_id
    }
}

impl Default for DocumentSelector {
    fn default() -> Self {
        Self::yag_templates()
    }
}
