//! Layered application configuration.
//!
//! Sources, lowest priority first: built-in defaults, a TOML file
//! (`topic-quiz.toml` unless another path is given), then `QUIZ__`-prefixed
//! environment variables such as `QUIZ__PROVIDER__MODEL`. A `.env` file is
//! loaded into the environment beforehand, and `GEMINI_API_KEY` fills in the
//! API key when no other source sets one.

use std::env;
use std::path::Path;

use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;
use tracing::debug;

use crate::provider::{DEFAULT_MAX_RETRIES, MalformedPolicy};

pub const DEFAULT_CONFIG_FILE: &str = "topic-quiz.toml";
const API_KEY_VAR: &str = "GEMINI_API_KEY";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub log: LogConfig,
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".into()
}

fn default_model() -> String {
    "gemini-2.0-flash".into()
}

fn default_temperature() -> f32 {
    0.8
}

fn default_top_k() -> u32 {
    40
}

fn default_top_p() -> f32 {
    0.95
}

fn default_max_output_tokens() -> u32 {
    1024
}

fn default_max_retries() -> u32 {
    DEFAULT_MAX_RETRIES
}

fn default_request_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_top_k")]
    pub top_k: u32,
    #[serde(default = "default_top_p")]
    pub top_p: f32,
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub on_malformed: MalformedPolicy,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            api_key: String::new(),
            temperature: default_temperature(),
            top_k: default_top_k(),
            top_p: default_top_p(),
            max_output_tokens: default_max_output_tokens(),
            max_retries: default_max_retries(),
            request_timeout_secs: default_request_timeout_secs(),
            on_malformed: MalformedPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub level: String,
    pub file: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            file: "topic-quiz.log".into(),
        }
    }
}

impl AppConfig {
    /// Loads the configuration. An explicitly given file must exist; the
    /// default file is optional.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let mut config: AppConfig = Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix("QUIZ")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        if config.provider.api_key.is_empty() {
            if let Ok(key) = env::var(API_KEY_VAR) {
                config.provider.api_key = key;
            }
        }

        debug!(
            model = %config.provider.model,
            max_retries = config.provider.max_retries,
            has_api_key = !config.provider.api_key.is_empty(),
            "Loaded config"
        );

        Ok(config)
    }

    /// Parses a TOML document on top of the defaults, without consulting the
    /// environment.
    pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from_str(source, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_toml("").unwrap();

        assert_eq!(config.provider.model, "gemini-2.0-flash");
        assert_eq!(config.provider.temperature, 0.8);
        assert_eq!(config.provider.top_k, 40);
        assert_eq!(config.provider.top_p, 0.95);
        assert_eq!(config.provider.max_output_tokens, 1024);
        assert_eq!(config.provider.max_retries, 3);
        assert_eq!(config.provider.on_malformed, MalformedPolicy::Retry);
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn test_file_overrides_defaults() {
        let config = AppConfig::from_toml(
            r#"
            [provider]
            model = "gemini-1.5-pro"
            max_retries = 5
            on_malformed = "placeholder"

            [log]
            level = "debug"
            "#,
        )
        .unwrap();

        assert_eq!(config.provider.model, "gemini-1.5-pro");
        assert_eq!(config.provider.max_retries, 5);
        assert_eq!(config.provider.on_malformed, MalformedPolicy::Placeholder);
        assert_eq!(config.provider.top_k, 40);
        assert_eq!(config.log.level, "debug");
        assert_eq!(config.log.file, "topic-quiz.log");
    }

    #[test]
    fn test_unknown_policy_is_rejected() {
        let result = AppConfig::from_toml(
            r#"
            [provider]
            on_malformed = "ignore"
            "#,
        );
        assert!(result.is_err());
    }
}
