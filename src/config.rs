//! User-level client settings.
//!
//! Settings live in a JSON document in the user's home directory and are
//! merged into outgoing envelopes via
//! [`merge_client_config`](crate::protocol::merge_client_config). Loading
//! is best-effort: an absent or unreadable file simply means "no
//! settings".

use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

/// File name of the per-user settings document, relative to the home
/// directory.
pub const SETTINGS_FILE: &str = ".gridlink.json";

/// Load the user settings document from `home`, or `None` when the file
/// is absent or not a well-formed document.
pub fn load_user_settings(home: &Path) -> Option<Value> {
    let path = home.join(SETTINGS_FILE);
    let text = match std::fs::read_to_string(&path) {
        Ok(text) => text,
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "No user settings");
            return None;
        }
    };
    match serde_json::from_str(&text) {
        Ok(doc) => Some(doc),
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "Unreadable user settings");
            None
        }
    }
}

/// Typed view over the settings fields this crate understands. Unknown
/// fields are preserved in the raw document and still travel inside
/// envelopes.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClientSettings {
    pub default_queue: Option<String>,
    pub email_recipients: Vec<String>,
}

impl ClientSettings {
    pub fn from_document(document: &Value) -> Self {
        serde_json::from_value(document.clone()).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn absent_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_user_settings(dir.path()).is_none());
    }

    #[test]
    fn well_formed_settings_load() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(SETTINGS_FILE),
            r#"{"default_queue": "batch.q", "email_recipients": ["ops@example.org"]}"#,
        )
        .unwrap();

        let doc = load_user_settings(dir.path()).unwrap();
        let settings = ClientSettings::from_document(&doc);
        assert_eq!(settings.default_queue.as_deref(), Some("batch.q"));
        assert_eq!(settings.email_recipients, vec!["ops@example.org"]);
    }

    #[test]
    fn malformed_settings_are_none() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(SETTINGS_FILE), "{not json").unwrap();
        assert!(load_user_settings(dir.path()).is_none());
    }

    #[test]
    fn typed_view_tolerates_unknown_fields() {
        let doc = json!({ "default_queue": "fast.q", "theme": "dark" });
        let settings = ClientSettings::from_document(&doc);
        assert_eq!(settings.default_queue.as_deref(), Some("fast.q"));
        assert!(settings.email_recipients.is_empty());
    }
}
