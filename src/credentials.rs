//! Saved login state
//!
//! Username, app key and optionally the password, read at startup and
//! written after a successful login when "remember" is enabled; the whole
//! file is cleared when it is not. The file is owner-readable only on Unix;
//! there is no OS keychain integration.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Remembered login state for pre-filling the next session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedCredentials {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub app_key: String,
    #[serde(default)]
    pub remember: bool,
    /// Present only when `remember` was set at save time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl SavedCredentials {
    /// Load from `path`; a missing file is an empty, non-remembered state.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Persist after a successful login.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
        }

        Ok(())
    }

    /// Forget everything stored at `path`.
    pub fn clear(path: &Path) -> anyhow::Result<()> {
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.toml");
        let creds = SavedCredentials::load(&path).unwrap();
        assert_eq!(creds, SavedCredentials::default());
        assert!(!creds.remember);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.toml");

        let creds = SavedCredentials {
            username: "punter".to_string(),
            app_key: "app-key-1".to_string(),
            remember: true,
            password: Some("hunter2".to_string()),
        };
        creds.save(&path).unwrap();

        let loaded = SavedCredentials::load(&path).unwrap();
        assert_eq!(loaded, creds);
    }

    #[test]
    fn test_save_without_password_omits_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.toml");

        let creds = SavedCredentials {
            username: "punter".to_string(),
            app_key: "app-key-1".to_string(),
            remember: true,
            password: None,
        };
        creds.save(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(!content.contains("password"));
    }

    #[test]
    fn test_clear_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.toml");

        SavedCredentials::default().save(&path).unwrap();
        assert!(path.exists());

        SavedCredentials::clear(&path).unwrap();
        assert!(!path.exists());
        // Clearing an already-clean path is fine
        SavedCredentials::clear(&path).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn test_saved_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.toml");
        SavedCredentials::default().save(&path).unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
