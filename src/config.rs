//! Client configuration.
//!
//! Configuration is read from a TOML file; every field has a default so an
//! absent file or an empty one yields a usable configuration.
//!
//! ```toml
//! base_url = "http://files.lan:8059"
//! proxy = "socks5://127.0.0.1:1080"
//! timeout_secs = 30
//! credentials_file = "/home/me/.config/remotefm/credentials.json"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{FmError, Result};

/// Directory name used under the platform config directory.
const APP_DIR: &str = "remotefm";
const CONFIG_FILE: &str = "config.toml";
const CREDENTIALS_FILE: &str = "credentials.json";

/// Environment variable overriding [`ClientConfig::base_url`].
pub const URL_ENV: &str = "REMOTEFM_URL";

/// Settings for talking to one file-manager server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Server root, e.g. `http://localhost:8059`.
    pub base_url: String,
    /// Optional HTTP/SOCKS proxy URL.
    pub proxy: Option<String>,
    /// Whole-request timeout; `None` keeps the HTTP layer default.
    pub timeout_secs: Option<u64>,
    /// Where credentials are persisted; `None` uses the platform default.
    pub credentials_file: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8059".to_string(),
            proxy: None,
            timeout_secs: None,
            credentials_file: None,
        }
    }
}

impl ClientConfig {
    /// Default location of the configuration file.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Load configuration from `path`, falling back to defaults when the file
    /// does not exist.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| FmError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from the default location, then apply environment overrides.
    pub fn discover() -> Result<Self> {
        let mut config = match Self::default_path() {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        if let Ok(url) = std::env::var(URL_ENV) {
            config.base_url = url;
        }
        config.validate()?;
        Ok(config)
    }

    /// Resolved credentials file location.
    pub fn credentials_path(&self) -> Option<PathBuf> {
        self.credentials_file.clone().or_else(|| {
            dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CREDENTIALS_FILE))
        })
    }

    fn validate(&self) -> Result<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(FmError::InvalidConfig(format!(
                "base_url must be an http(s) URL: {}",
                self.base_url
            )));
        }
        if self.timeout_secs == Some(0) {
            return Err(FmError::InvalidConfig("timeout_secs must be positive".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = ClientConfig::from_toml("").unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let config = ClientConfig::from_toml(
            "base_url = \"https://files.lan\"\ntimeout_secs = 15\n",
        )
        .unwrap();
        assert_eq!(config.base_url, "https://files.lan");
        assert_eq!(config.timeout_secs, Some(15));
        assert!(config.proxy.is_none());
    }

    #[test]
    fn test_rejects_bad_url() {
        let err = ClientConfig::from_toml("base_url = \"ftp://files\"").unwrap_err();
        assert!(matches!(err, FmError::InvalidConfig(_)));
    }

    #[test]
    fn test_rejects_zero_timeout() {
        assert!(ClientConfig::from_toml("timeout_secs = 0").is_err());
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = ClientConfig::load(dir.path().join("nope.toml")).unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn test_explicit_credentials_path_wins() {
        let config = ClientConfig {
            credentials_file: Some(PathBuf::from("/tmp/creds.json")),
            ..ClientConfig::default()
        };
        assert_eq!(config.credentials_path(), Some(PathBuf::from("/tmp/creds.json")));
    }
}
