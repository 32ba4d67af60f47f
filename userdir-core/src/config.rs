//! Configuration management
//!
//! Settings live in `settings.json` in the data directory:
//! ```json
//! {
//!   "app": { "demoMode": false },
//!   "directory": {
//!     "remoteUrl": "http://127.0.0.1:1010",
//!     "signupUrl": "https://example.com/signup",
//!     "sessionRecheck": "mount"
//!   }
//! }
//! ```
//! Fields this crate does not manage are preserved on save.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer, Serialize};

use crate::services::RecheckPolicy;

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    app: AppSettings,
    #[serde(default)]
    directory: DirectorySettings,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppSettings {
    #[serde(default)]
    demo_mode: bool,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DirectorySettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    remote_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    signup_url: Option<String>,
    #[serde(default, deserialize_with = "deserialize_recheck")]
    session_recheck: RecheckPolicy,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

/// Accepts any casing ("Render", "MOUNT"); null means the default
fn deserialize_recheck<'de, D>(deserializer: D) -> std::result::Result<RecheckPolicy, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(value) => value.parse().map_err(serde::de::Error::custom),
        None => Ok(RecheckPolicy::default()),
    }
}

fn read_settings(data_dir: &Path) -> Result<SettingsFile> {
    let settings_path = data_dir.join("settings.json");
    if !settings_path.exists() {
        return Ok(SettingsFile::default());
    }
    let content = std::fs::read_to_string(&settings_path)?;
    if content.trim().is_empty() {
        return Ok(SettingsFile::default());
    }
    serde_json::from_str(&content)
        .with_context(|| format!("Invalid settings file: {}", settings_path.display()))
}

/// Per-process overrides read from the environment
///
/// They change what this process does but are never written back to
/// settings.json.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvOverrides {
    /// USERDIR_DEMO_MODE
    pub demo_mode: Option<bool>,
    /// USERDIR_REMOTE_URL; `Some(None)` when set but empty
    pub remote_url: Option<Option<String>>,
}

impl EnvOverrides {
    pub fn from_env() -> Self {
        let demo_mode = match std::env::var("USERDIR_DEMO_MODE").ok().as_deref() {
            Some("true" | "1" | "yes" | "TRUE" | "YES") => Some(true),
            Some("false" | "0" | "no" | "FALSE" | "NO") => Some(false),
            _ => None,
        };

        let remote_url = std::env::var("USERDIR_REMOTE_URL").ok().map(|url| {
            if url.trim().is_empty() {
                None
            } else {
                Some(url)
            }
        });

        Self {
            demo_mode,
            remote_url,
        }
    }
}

/// Where the directory reads its users from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    /// DuckDB file in the data directory
    Local,
    /// Remote directory service base URL
    Remote(String),
}

/// userdir configuration (simplified view of settings)
///
/// The public fields mirror settings.json and are what `save` writes.
/// Environment overrides only affect [`Config::is_demo_mode`],
/// [`Config::db_filename`] and [`Config::data_source`].
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub demo_mode: bool,
    pub remote_url: Option<String>,
    pub signup_url: Option<String>,
    pub session_recheck: RecheckPolicy,
    overrides: EnvOverrides,
    // Keep the raw settings for preservation when saving
    _raw_settings: SettingsFile,
}

impl Config {
    /// Load config from the data directory, applying environment overrides
    ///
    /// - USERDIR_DEMO_MODE: true/false
    /// - USERDIR_REMOTE_URL: remote directory base URL (empty disables)
    ///
    /// A settings.json that does not parse is an error rather than a reset.
    pub fn load(data_dir: &Path) -> Result<Self> {
        Self::load_with(data_dir, EnvOverrides::from_env())
    }

    /// Load config with explicit overrides
    pub fn load_with(data_dir: &Path, overrides: EnvOverrides) -> Result<Self> {
        let raw = read_settings(data_dir)?;

        Ok(Self {
            demo_mode: raw.app.demo_mode,
            remote_url: raw.directory.remote_url.clone(),
            signup_url: raw.directory.signup_url.clone(),
            session_recheck: raw.directory.session_recheck,
            overrides,
            _raw_settings: raw,
        })
    }

    /// Save config to the data directory
    ///
    /// Re-reads the file first so fields written by other tools survive.
    /// Environment overrides are not persisted.
    pub fn save(&self, data_dir: &Path) -> Result<()> {
        let mut settings = read_settings(data_dir)?;

        settings.app.demo_mode = self.demo_mode;
        settings.directory.remote_url = self.remote_url.clone();
        settings.directory.signup_url = self.signup_url.clone();
        settings.directory.session_recheck = self.session_recheck;

        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(data_dir.join("settings.json"), content)?;
        Ok(())
    }

    /// Demo mode in effect for this process
    pub fn is_demo_mode(&self) -> bool {
        self.overrides.demo_mode.unwrap_or(self.demo_mode)
    }

    /// Database file name for the current mode
    pub fn db_filename(&self) -> &'static str {
        if self.is_demo_mode() {
            "demo.duckdb"
        } else {
            "directory.duckdb"
        }
    }

    /// Demo mode always reads the local demo database
    pub fn data_source(&self) -> DataSource {
        let remote_url = match &self.overrides.remote_url {
            Some(url) => url.as_ref(),
            None => self.remote_url.as_ref(),
        };
        match remote_url {
            Some(url) if !self.is_demo_mode() => DataSource::Remote(url.clone()),
            _ => DataSource::Local,
        }
    }

    pub fn enable_demo_mode(&mut self) {
        self.demo_mode = true;
    }

    pub fn disable_demo_mode(&mut self) {
        self.demo_mode = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_without_settings_file() {
        let dir = tempdir().unwrap();
        let config = Config::load_with(dir.path(), EnvOverrides::default()).unwrap();

        assert_eq!(config.session_recheck, RecheckPolicy::Mount);
        assert!(config.signup_url.is_none());
    }

    #[test]
    fn test_reads_directory_settings() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join("settings.json"),
            r#"{"directory": {"signupUrl": "https://example.com/signup", "sessionRecheck": "render"}}"#,
        )
        .unwrap();

        let config = Config::load_with(dir.path(), EnvOverrides::default()).unwrap();
        assert_eq!(config.signup_url.as_deref(), Some("https://example.com/signup"));
        assert_eq!(config.session_recheck, RecheckPolicy::Render);
    }

    #[test]
    fn test_save_preserves_unknown_fields() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(
            &path,
            r#"{"app": {"theme": "dark"}, "plugins": {"x": 1}, "directory": {"pageSize": 20}}"#,
        )
        .unwrap();

        let mut config = Config::load_with(dir.path(), EnvOverrides::default()).unwrap();
        config.signup_url = Some("https://example.com/signup".to_string());
        config.save(dir.path()).unwrap();

        let saved: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(saved["app"]["theme"], "dark");
        assert_eq!(saved["plugins"]["x"], 1);
        assert_eq!(saved["directory"]["pageSize"], 20);
        assert_eq!(saved["directory"]["signupUrl"], "https://example.com/signup");
    }

    #[test]
    fn test_env_overrides_are_not_saved() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"directory": {"remoteUrl": "http://configured:1010"}}"#).unwrap();

        let overrides = EnvOverrides {
            demo_mode: Some(true),
            remote_url: Some(None),
        };
        let mut config = Config::load_with(dir.path(), overrides).unwrap();
        assert!(config.is_demo_mode());
        assert_eq!(config.data_source(), DataSource::Local);

        config.signup_url = Some("https://example.com/signup".to_string());
        config.save(dir.path()).unwrap();

        let saved: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(saved["directory"]["remoteUrl"], "http://configured:1010");
        assert_eq!(saved["app"]["demoMode"], false);

        let reloaded = Config::load_with(dir.path(), EnvOverrides::default()).unwrap();
        assert_eq!(
            reloaded.data_source(),
            DataSource::Remote("http://configured:1010".to_string())
        );
    }

    #[test]
    fn test_recheck_policy_is_case_insensitive() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join("settings.json"),
            r#"{"directory": {"remoteUrl": "http://configured:1010", "signupUrl": "https://x/signup", "sessionRecheck": "Render"}}"#,
        )
        .unwrap();

        let config = Config::load_with(dir.path(), EnvOverrides::default()).unwrap();
        assert_eq!(config.session_recheck, RecheckPolicy::Render);
        assert_eq!(config.remote_url.as_deref(), Some("http://configured:1010"));
        assert_eq!(config.signup_url.as_deref(), Some("https://x/signup"));
    }

    #[test]
    fn test_invalid_settings_are_not_overwritten() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let original = r#"{"directory": {"remoteUrl": "http://configured:1010", "sessionRecheck": "sometimes"}}"#;
        std::fs::write(&path, original).unwrap();

        let err = Config::load_with(dir.path(), EnvOverrides::default()).unwrap_err();
        assert!(format!("{:#}", err).contains("sometimes"));

        assert!(Config::default().save(dir.path()).is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), original);
    }

    #[test]
    fn test_data_source() {
        let mut config = Config {
            remote_url: Some("http://127.0.0.1:1010".to_string()),
            ..Config::default()
        };
        assert_eq!(
            config.data_source(),
            DataSource::Remote("http://127.0.0.1:1010".to_string())
        );
        assert_eq!(config.db_filename(), "directory.duckdb");

        config.enable_demo_mode();
        assert_eq!(config.data_source(), DataSource::Local);
        assert_eq!(config.db_filename(), "demo.duckdb");
    }
}
