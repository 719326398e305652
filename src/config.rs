//! Configuration Management
//!
//! Persistent defaults for mmaictl, and the per-invocation session built from
//! them together with the global command-line options.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Base URL used when neither flag, environment nor config file provide one
pub const DEFAULT_API_URL: &str = "http://localhost:32323/v1";

/// User configuration
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Platform API base URL
    #[serde(default)]
    pub api_url: Option<String>,
    /// Bearer token
    #[serde(default)]
    pub token: Option<String>,
    /// Cluster used when a command needs one and `--cluster` is omitted
    #[serde(default)]
    pub cluster: Option<String>,
}

impl Config {
    /// Get the default config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("mmaictl").join("config.json"))
    }

    /// Load configuration from `path`, or from the default location.
    ///
    /// A missing file yields defaults. A file that cannot be read or parsed
    /// is an error; the caller decides whether to fall back.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match Self::config_path() {
                Some(p) => p,
                None => return Ok(Self::default()),
            },
        };

        if !path.exists() {
            return Ok(Self::default());
        }

        Self::load_from(&path)
    }

    fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        serde_json::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }
}

/// Process-wide settings for one invocation. Read-only once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub base_url: String,
    pub token: Option<String>,
    pub verbosity: u8,
    pub quiet: bool,
    /// Fallback for the `{cluster}` placeholder
    pub default_cluster: Option<String>,
}

impl Session {
    /// Merge command-line values (which already include environment
    /// variables, via clap) over the config file and built-in defaults.
    pub fn resolve(
        api_url: Option<&str>,
        token: Option<&str>,
        verbosity: u8,
        quiet: bool,
        config: &Config,
    ) -> Self {
        let base_url = api_url
            .map(str::to_string)
            .or_else(|| config.api_url.clone())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let token = token
            .map(str::to_string)
            .or_else(|| config.token.clone())
            .filter(|t| !t.is_empty());

        Self {
            base_url,
            token,
            verbosity,
            quiet,
            default_cluster: config.cluster.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(Some(&dir.path().join("absent.json"))).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn loads_all_fields() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"api_url":"https://mmai.example/v1","token":"abc","cluster":"prod"}}"#
        )
        .unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.api_url.as_deref(), Some("https://mmai.example/v1"));
        assert_eq!(config.token.as_deref(), Some("abc"));
        assert_eq!(config.cluster.as_deref(), Some("prod"));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        let err = Config::load(Some(file.path())).unwrap_err();
        assert!(format!("{:#}", err).contains("failed to parse"));
    }

    #[test]
    fn flags_override_config_file() {
        let config = Config {
            api_url: Some("https://from-file/v1".into()),
            token: Some("file-token".into()),
            cluster: Some("c1".into()),
        };

        let session = Session::resolve(Some("https://from-flag/v1"), None, 1, false, &config);
        assert_eq!(session.base_url, "https://from-flag/v1");
        assert_eq!(session.token.as_deref(), Some("file-token"));
        assert_eq!(session.default_cluster.as_deref(), Some("c1"));
        assert_eq!(session.verbosity, 1);
    }

    #[test]
    fn defaults_apply_without_config() {
        let session = Session::resolve(None, Some(""), 0, true, &Config::default());
        assert_eq!(session.base_url, DEFAULT_API_URL);
        assert_eq!(session.token, None);
        assert!(session.quiet);
    }
}
