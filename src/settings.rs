use crate::data::ListNames;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Persistent user settings loaded from ~/.config/crm-change-request.toml
#[derive(Debug, Deserialize, Default)]
pub struct Settings {
    /// SharePoint site hosting the lists, e.g. https://contoso.sharepoint.com/sites/crm
    pub site_url: Option<String>,

    /// Bearer token sent with every request
    pub access_token: Option<String>,

    /// Per-request timeout in seconds; unset means no timeout
    pub timeout_secs: Option<u64>,

    /// Directory for log files
    pub log_dir: Option<PathBuf>,

    /// List titles
    #[serde(default)]
    pub lists: ListNames,
}

impl Settings {
    /// Load from the default config path. Returns Default if missing or malformed.
    pub fn load() -> Self {
        if let Some(path) = config_path() {
            Self::load_from(&path)
        } else {
            Self::default()
        }
    }

    fn load_from(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(_) => return Self::default(),
        };
        match toml::from_str::<Settings>(&content) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("Warning: failed to parse {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}

/// Returns ~/.config/crm-change-request.toml (XDG-style).
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("crm-change-request.toml"))
}

/// Default log directory under the platform's local data dir.
pub fn default_log_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("crm-change-request")
        .join("logs")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load_from(&dir.path().join("missing.toml"));
        assert!(settings.site_url.is_none());
        assert!(settings.timeout_secs.is_none());
        assert_eq!(settings.lists, ListNames::default());
    }

    #[test]
    fn test_load_valid_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("crm.toml");
        fs::write(
            &path,
            r#"
site_url = "https://contoso.sharepoint.com/sites/crm"
timeout_secs = 20
log_dir = "/var/log/crm"

[lists]
clients = "Customers"
requests = "ChangeRequests"
"#,
        )
        .unwrap();
        let settings = Settings::load_from(&path);
        assert_eq!(
            settings.site_url.as_deref(),
            Some("https://contoso.sharepoint.com/sites/crm")
        );
        assert_eq!(settings.timeout_secs, Some(20));
        assert_eq!(settings.log_dir, Some(PathBuf::from("/var/log/crm")));
        assert_eq!(settings.lists.clients, "Customers");
        assert_eq!(settings.lists.projects, "ClientProject");
        assert_eq!(settings.lists.requests, "ChangeRequests");
    }

    #[test]
    fn test_load_malformed_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "site_url = [1, 2\n").unwrap();
        let settings = Settings::load_from(&path);
        assert!(settings.site_url.is_none());
    }
}
