use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct DaybookConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub classifier: ClassifierConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub log_level: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    pub db_path: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Base URL of an OpenAI-compatible API (without `/chat/completions`).
    pub endpoint: String,
    pub model: String,
    /// Bearer credential. `None` selects keyword-only classification.
    pub api_key: Option<String>,
    pub timeout_ms: u64,
    pub temperature: f32,
    pub max_tokens: u32,
    /// `"auto"`, `"en"` or `"zh"`.
    pub prompt_language: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 8787,
            log_level: "info".into(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        let db_path = default_daybook_dir()
            .join("diary.db")
            .to_string_lossy()
            .into_owned();
        Self { db_path }
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.deepseek.com/v1".into(),
            model: "deepseek-chat".into(),
            api_key: None,
            timeout_ms: 5000,
            temperature: 0.3,
            max_tokens: 10,
            prompt_language: "auto".into(),
        }
    }
}

impl ClassifierConfig {
    /// The configured credential, treating a blank string as absent.
    pub fn credential(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

/// Returns `~/.daybook/`
pub fn default_daybook_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".daybook")
}

/// Returns the default config file path: `~/.daybook/config.toml`
pub fn default_config_path() -> PathBuf {
    default_daybook_dir().join("config.toml")
}

impl DaybookConfig {
    /// Load config from TOML file (if it exists) then apply env var overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(default_config_path())
    }

    /// Load from a specific path, then apply env var overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let contents =
                std::fs::read_to_string(path).context("failed to read config file")?;
            toml::from_str(&contents).context("failed to parse config TOML")?
        } else {
            info!("no config file at {}, using defaults", path.display());
            DaybookConfig::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides (DAYBOOK_DB, DAYBOOK_HOST, DAYBOOK_PORT,
    /// DAYBOOK_LOG_LEVEL, DAYBOOK_CLASSIFIER_ENDPOINT, DEEPSEEK_API_KEY).
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("DAYBOOK_DB") {
            self.storage.db_path = val;
        }
        if let Ok(val) = std::env::var("DAYBOOK_HOST") {
            self.server.host = val;
        }
        if let Ok(val) = std::env::var("DAYBOOK_PORT") {
            match val.parse() {
                Ok(port) => self.server.port = port,
                Err(_) => tracing::warn!(value = %val, "ignoring invalid DAYBOOK_PORT"),
            }
        }
        if let Ok(val) = std::env::var("DAYBOOK_LOG_LEVEL") {
            self.server.log_level = val;
        }
        if let Ok(val) = std::env::var("DAYBOOK_CLASSIFIER_ENDPOINT") {
            self.classifier.endpoint = val;
        }
        if let Ok(val) = std::env::var("DEEPSEEK_API_KEY") {
            self.classifier.api_key = Some(val);
        }
    }

    /// Resolve the database path, expanding `~` if needed.
    pub fn resolved_db_path(&self) -> PathBuf {
        expand_tilde(&self.storage.db_path)
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = DaybookConfig::default();
        assert_eq!(config.server.port, 8787);
        assert_eq!(config.server.log_level, "info");
        assert_eq!(config.classifier.model, "deepseek-chat");
        assert_eq!(config.classifier.max_tokens, 10);
        assert!(config.classifier.credential().is_none());
        assert!(config.storage.db_path.ends_with("diary.db"));
    }

    #[test]
    fn parse_toml_config() {
        let toml_str = r#"
[server]
log_level = "debug"
port = 9000

[storage]
db_path = "/tmp/test.db"

[classifier]
api_key = "sk-test"
prompt_language = "zh"
"#;
        let config: DaybookConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.log_level, "debug");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.storage.db_path, "/tmp/test.db");
        assert_eq!(config.classifier.credential(), Some("sk-test"));
        assert_eq!(config.classifier.prompt_language, "zh");
        // defaults still apply for unset fields
        assert_eq!(config.classifier.timeout_ms, 5000);
        assert_eq!(config.server.host, "127.0.0.1");
    }

    #[test]
    fn blank_api_key_counts_as_absent() {
        let config = ClassifierConfig {
            api_key: Some("   ".into()),
            ..Default::default()
        };
        assert!(config.credential().is_none());
    }

    #[test]
    fn env_overrides_apply() {
        let mut config = DaybookConfig::default();
        std::env::set_var("DAYBOOK_DB", "/tmp/override.db");
        std::env::set_var("DAYBOOK_PORT", "not-a-port");
        std::env::set_var("DAYBOOK_LOG_LEVEL", "trace");
        std::env::set_var("DEEPSEEK_API_KEY", "sk-env");

        config.apply_env_overrides();

        assert_eq!(config.storage.db_path, "/tmp/override.db");
        assert_eq!(config.server.port, 8787);
        assert_eq!(config.server.log_level, "trace");
        assert_eq!(config.classifier.credential(), Some("sk-env"));

        // Clean up
        std::env::remove_var("DAYBOOK_DB");
        std::env::remove_var("DAYBOOK_PORT");
        std::env::remove_var("DAYBOOK_LOG_LEVEL");
        std::env::remove_var("DEEPSEEK_API_KEY");
    }
}
