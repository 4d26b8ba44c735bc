use serde::{Deserialize, Serialize};

/// A saved shortcut, as stored in the synced shortcut list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shortcut {
    /// Bound keyboard command, or empty.
    #[serde(default)]
    pub command: String,
    pub title: String,
    pub url: String,
    /// Hostnames or patterns the shortcut is shown on. Empty means everywhere.
    #[serde(default)]
    pub domains: Vec<String>,
    #[serde(default)]
    pub shortcut_key: String,
}

impl Shortcut {
    pub fn has_command(&self) -> bool {
        !self.command.is_empty()
    }

    pub fn targets_domain(&self, domain: &str) -> bool {
        self.domains.iter().any(|d| d == domain)
    }
}

/// Form input for creating or editing a shortcut.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShortcutDraft {
    pub title: String,
    pub url: String,
    pub command: Option<String>,
}

impl ShortcutDraft {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            command: None,
        }
    }

    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = Some(command.into());
        self
    }

    pub(crate) fn command_id(&self) -> &str {
        self.command.as_deref().map(str::trim).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_legacy_entries_without_optional_fields() {
        let shortcut: Shortcut =
            serde_json::from_str(r#"{"title":"Docs","url":"https://docs.rs"}"#).unwrap();
        assert!(!shortcut.has_command());
        assert!(shortcut.domains.is_empty());
    }

    #[test]
    fn wire_format_is_camel_case() {
        let shortcut = Shortcut {
            command: "shortcut-01".into(),
            title: "Mail".into(),
            url: "https://mail.example.com".into(),
            domains: vec!["mail.example.com".into()],
            shortcut_key: String::new(),
        };
        let value = serde_json::to_value(&shortcut).unwrap();
        assert_eq!(value["shortcutKey"], "");
        assert_eq!(value["domains"][0], "mail.example.com");
    }
}
