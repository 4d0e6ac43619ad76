//! Editor Configuration
//!
//! Read from `formkit.json` in a workspace, then overridden by
//! `FORMKIT_*` environment variables.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::editor::DEFAULT_HISTORY_CAPACITY;
use crate::error::{FormError, Result};

/// Config file name inside a workspace.
pub const CONFIG_FILE: &str = "formkit.json";

pub const ENV_HISTORY_CAPACITY: &str = "FORMKIT_HISTORY_CAPACITY";
pub const ENV_STORE_DIR: &str = "FORMKIT_STORE_DIR";
pub const ENV_API_URL: &str = "FORMKIT_API_URL";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorConfig {
    /// Maximum number of snapshots kept by the undo history.
    pub history_capacity: usize,

    /// Directory of the JSON file store. Relative paths resolve against
    /// the workspace.
    pub store_dir: PathBuf,

    /// Base URL of a remote form API. When set, saves go there instead of
    /// the file store.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base_url: Option<String>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            store_dir: PathBuf::from("forms"),
            api_base_url: None,
        }
    }
}

impl EditorConfig {
    /// Load `formkit.json` from `workspace` (defaults when absent) and apply
    /// environment overrides.
    pub fn load(workspace: &Path) -> Result<Self> {
        Self::load_file(&workspace.join(CONFIG_FILE))?.with_overrides(|key| env::var(key).ok())
    }

    /// Read a config file without environment overrides.
    pub fn load_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|e| FormError::FileReadError {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: EditorConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, workspace: &Path) -> Result<()> {
        let path = workspace.join(CONFIG_FILE);
        let content = serde_json::to_string_pretty(self)?;
        fs::write(&path, content).map_err(|e| FormError::FileWriteError { path, source: e })?;
        Ok(())
    }

    /// Apply overrides looked up by variable name.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(raw) = lookup(ENV_HISTORY_CAPACITY) {
            self.history_capacity = raw.trim().parse().map_err(|_| FormError::InvalidConfig {
                reason: format!("{} must be a positive integer, got '{}'", ENV_HISTORY_CAPACITY, raw),
            })?;
        }
        if let Some(dir) = lookup(ENV_STORE_DIR) {
            self.store_dir = PathBuf::from(dir);
        }
        if let Some(url) = lookup(ENV_API_URL) {
            self.api_base_url = Some(url).filter(|u| !u.trim().is_empty());
        }
        self.validate()?;
        Ok(self)
    }

    /// The store directory resolved against `workspace`.
    pub fn store_path(&self, workspace: &Path) -> PathBuf {
        if self.store_dir.is_absolute() {
            self.store_dir.clone()
        } else {
            workspace.join(&self.store_dir)
        }
    }

    fn validate(&self) -> Result<()> {
        if self.history_capacity == 0 {
            return Err(FormError::InvalidConfig {
                reason: "history capacity must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = EditorConfig::load_file(&temp_dir.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(config, EditorConfig::default());
        assert_eq!(config.history_capacity, 50);
    }

    #[test]
    fn test_file_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let config = EditorConfig {
            history_capacity: 10,
            store_dir: PathBuf::from("saved"),
            api_base_url: Some("http://localhost:3000".to_string()),
        };
        config.save(temp_dir.path()).unwrap();

        let loaded = EditorConfig::load_file(&temp_dir.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE);
        fs::write(&path, r#"{"historyCapacity": 5}"#).unwrap();

        let config = EditorConfig::load_file(&path).unwrap();
        assert_eq!(config.history_capacity, 5);
        assert_eq!(config.store_dir, PathBuf::from("forms"));
    }

    #[test]
    fn test_env_overrides() {
        let config = EditorConfig::default()
            .with_overrides(lookup(&[
                (ENV_HISTORY_CAPACITY, "20"),
                (ENV_STORE_DIR, "/tmp/forms"),
                (ENV_API_URL, "http://api.local"),
            ]))
            .unwrap();
        assert_eq!(config.history_capacity, 20);
        assert_eq!(config.store_path(Path::new("/ws")), PathBuf::from("/tmp/forms"));
        assert_eq!(config.api_base_url.as_deref(), Some("http://api.local"));
    }

    #[test]
    fn test_invalid_capacity() {
        let err = EditorConfig::default()
            .with_overrides(lookup(&[(ENV_HISTORY_CAPACITY, "lots")]))
            .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_CONFIG");

        let err = EditorConfig::default()
            .with_overrides(lookup(&[(ENV_HISTORY_CAPACITY, "0")]))
            .unwrap_err();
        assert!(matches!(err, FormError::InvalidConfig { .. }));
    }

    #[test]
    fn test_relative_store_dir_resolves_against_workspace() {
        let config = EditorConfig::default();
        assert_eq!(config.store_path(Path::new("/ws")), PathBuf::from("/ws/forms"));
    }
}
