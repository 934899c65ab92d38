//! Configuration for the review server and CLI
//!
//! Loaded from a TOML file; every field has a default so an empty or
//! missing file gives a working setup in the current directory.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable naming a config file
pub const CONFIG_ENV: &str = "WORTSCHATZ_CONFIG";

/// Environment variable holding the language model API key
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error reading {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config file {path:?}: {source}")]
    Toml {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Word list being reviewed
    pub word_list: PathBuf,
    /// Plain list of words used by `rebuild`
    pub backup_list: PathBuf,
    /// Timestamps of review starts
    pub run_log: PathBuf,
    /// Address the review server listens on
    pub bind: String,
    pub llm: LlmConfig,
    pub sessions: SessionConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            word_list: PathBuf::from("A1Wortlist.csv"),
            backup_list: PathBuf::from("A1Wortlist-backup.csv"),
            run_log: PathBuf::from("lastRun.txt"),
            bind: "127.0.0.1:5000".to_string(),
            llm: LlmConfig::default(),
            sessions: SessionConfig::default(),
        }
    }
}

/// Settings for the OpenAI-compatible chat completion endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub base_url: String,
    pub model: String,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-3.5-turbo".to_string(),
            api_key: None,
            max_tokens: 500,
            timeout_secs: 120,
        }
    }
}

/// Limits for in-memory review sessions and story results
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub ttl_secs: u64,
    pub max_entries: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_secs: 24 * 60 * 60,
            max_entries: 256,
        }
    }
}

impl Config {
    /// Default config file location (`~/.config/wortschatz/config.toml` on Linux)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("wortschatz").join("config.toml"))
    }

    /// Load config from an explicit path, `$WORTSCHATZ_CONFIG`, or the
    /// default location, falling back to defaults when none exists.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let candidate = path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from))
            .or_else(Self::default_path);

        let mut config = match candidate {
            // An explicitly requested file must exist
            Some(p) if path.is_some() || p.exists() => Self::from_file(&p)?,
            _ => {
                log::debug!("No config file found, using defaults");
                Self::default()
            }
        };

        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.is_empty() {
                config.llm.api_key = Some(key);
            }
        }

        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse(&content).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.word_list, PathBuf::from("A1Wortlist.csv"));
        assert_eq!(config.bind, "127.0.0.1:5000");
        assert_eq!(config.llm.model, "gpt-3.5-turbo");
        assert_eq!(config.llm.max_tokens, 500);
        assert_eq!(config.sessions.max_entries, 256);
    }

    #[test]
    fn test_partial_config() {
        let config = Config::parse(
            r#"
            word_list = "/srv/words.csv"

            [llm]
            model = "gpt-4o-mini"
            api_key = "sk-test"

            [sessions]
            ttl_secs = 60
            "#,
        )
        .unwrap();

        assert_eq!(config.word_list, PathBuf::from("/srv/words.csv"));
        assert_eq!(config.run_log, PathBuf::from("lastRun.txt"));
        assert_eq!(config.llm.model, "gpt-4o-mini");
        assert_eq!(config.llm.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.llm.base_url, "https://api.openai.com/v1");
        assert_eq!(config.sessions.ttl_secs, 60);
        assert_eq!(config.sessions.max_entries, 256);
    }

    #[test]
    fn test_invalid_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "word_list = [").unwrap();
        assert!(matches!(Config::from_file(&path), Err(ConfigError::Toml { .. })));
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let temp = TempDir::new().unwrap();
        let result = Config::load(Some(&temp.path().join("nope.toml")));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
