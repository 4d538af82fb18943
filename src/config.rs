//! # Configuration Module
//!
//! Runtime settings for the clinic bots. Values come from the process
//! environment (optionally seeded from a `.env` file by `main`), with
//! defaults matching the production deployment.

use std::path::PathBuf;
use std::time::Duration;

use crate::errors::ConfigError;
use crate::localization::DEFAULT_LANGUAGE;

// Defaults used when the matching variable is unset
pub const DEFAULT_API_URL: &str = "https://app.future-it-pro.ru/api";
pub const DEFAULT_TOKENS_FILE: &str = "tokens.json";
pub const DEFAULT_USERS_FILE: &str = "name.json";
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 10;

/// Output format for the tracing subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Settings shared by every bot identity
#[derive(Debug, Clone, PartialEq)]
pub struct BotConfig {
    /// Base URL of the clinic REST API, without trailing slash
    pub api_url: String,
    /// JSON file with the bot tokens to run
    pub tokens_file: PathBuf,
    /// JSON file with the known user profiles
    pub users_file: PathBuf,
    /// Upper bound for each upstream request
    pub upstream_timeout: Duration,
    /// Language of every user-facing text
    pub language: String,
    pub log_format: LogFormat,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            tokens_file: PathBuf::from(DEFAULT_TOKENS_FILE),
            users_file: PathBuf::from(DEFAULT_USERS_FILE),
            upstream_timeout: Duration::from_secs(DEFAULT_UPSTREAM_TIMEOUT_SECS),
            language: DEFAULT_LANGUAGE.to_string(),
            log_format: LogFormat::Text,
        }
    }
}

impl BotConfig {
    /// Read the configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from any key/value source
    ///
    /// Unset or blank keys fall back to the defaults. A timeout that is not a
    /// positive integer, an unknown log format or an unsupported language is
    /// rejected.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let mut config = Self::default();

        if let Some(url) = get("CLINIC_API_URL") {
            config.api_url = url.trim_end_matches('/').to_string();
        }
        if let Some(path) = get("TOKENS_FILE") {
            config.tokens_file = PathBuf::from(path);
        }
        if let Some(path) = get("USERS_FILE") {
            config.users_file = PathBuf::from(path);
        }
        if let Some(raw) = get("UPSTREAM_TIMEOUT_SECS") {
            let secs = raw
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or(ConfigError::InvalidValue {
                    key: "UPSTREAM_TIMEOUT_SECS",
                    value: raw.clone(),
                })?;
            config.upstream_timeout = Duration::from_secs(secs);
        }
        if let Some(language) = get("BOT_LANGUAGE") {
            if !crate::localization::is_supported_language(&language) {
                return Err(ConfigError::InvalidValue {
                    key: "BOT_LANGUAGE",
                    value: language,
                });
            }
            config.language = language;
        }
        if let Some(format) = get("LOG_FORMAT") {
            config.log_format = match format.to_ascii_lowercase().as_str() {
                "text" => LogFormat::Text,
                "json" => LogFormat::Json,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: "LOG_FORMAT",
                        value: format,
                    })
                }
            };
        }

        Ok(config)
    }
}
