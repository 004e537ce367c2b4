//! Application configuration
//!
//! Configuration is built once at startup and passed explicitly into the
//! storage layer, the router and the bot. Sources, lowest priority first:
//!
//! 1. built-in defaults
//! 2. optional TOML file (`abiturbot.toml` unless `--config` is given)
//! 3. `ABITURBOT_*` environment variables (nested keys separated by `__`,
//!    e.g. `ABITURBOT_DISPLAY__MAX_LIST_ITEMS=5`)
//! 4. `BOT_TOKEN`, `DATABASE_PATH`, `LOG_FILE_PATH`, `LOG_LEVEL`

use std::path::Path;
use std::time::Duration;

use figment::providers::{Env, Format, Toml};
use figment::Figment;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer};

use crate::core::error::{AppError, AppResult};

/// Default config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "abiturbot.toml";

/// Minimal plausible bot token length
const MIN_TOKEN_LEN: usize = 10;

#[derive(Debug, Deserialize)]
pub struct Config {
    /// Bot token, required only for `run`
    #[serde(default, deserialize_with = "deserialize_secret")]
    pub bot_token: Option<SecretString>,
    /// Custom Bot API server (local telegram-bot-api)
    #[serde(default)]
    pub bot_api_url: Option<String>,
    #[serde(default = "default_database_path")]
    pub database_path: String,
    #[serde(default = "default_log_file_path")]
    pub log_file_path: String,
    /// One of `error`, `warn`, `info`, `debug`, `trace`
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub support: SupportConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bot_token: None,
            bot_api_url: None,
            database_path: default_database_path(),
            log_file_path: default_log_file_path(),
            log_level: default_log_level(),
            network: NetworkConfig::default(),
            display: DisplayConfig::default(),
            support: SupportConfig::default(),
        }
    }
}

impl Config {
    /// Loads configuration from a TOML file and the environment.
    ///
    /// An explicitly given file must exist; the default `abiturbot.toml` is
    /// optional.
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        let path = match path {
            Some(path) if !path.is_file() => {
                return Err(AppError::Validation(format!("config file {} not found", path.display())));
            }
            Some(path) => path,
            None => Path::new(DEFAULT_CONFIG_FILE),
        };
        let figment = Figment::new()
            .merge(Toml::file(path))
            .merge(Env::prefixed("ABITURBOT_").split("__"))
            .merge(Env::raw().only(&["bot_token", "database_path", "log_file_path", "log_level"]));
        Self::from_figment(figment)
    }

    /// Extracts configuration from an already assembled figment.
    pub fn from_figment(figment: Figment) -> AppResult<Self> {
        let config: Config = figment.extract()?;
        config.display.validate()?;
        Ok(config)
    }

    /// Checks the settings that only matter when talking to Telegram.
    pub fn validate_for_bot(&self) -> AppResult<()> {
        let token = self
            .bot_token
            .as_ref()
            .ok_or_else(|| AppError::Validation("BOT_TOKEN is not set".to_string()))?;
        let token = token.expose_secret();
        if token.trim().is_empty() {
            return Err(AppError::Validation("Bot token cannot be empty".to_string()));
        }
        if token.len() < MIN_TOKEN_LEN {
            return Err(AppError::Validation("Bot token seems too short".to_string()));
        }
        Ok(())
    }

    /// Parses `log_level` into a filter, falling back to `Info`.
    pub fn log_level_filter(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or(log::LevelFilter::Info)
    }
}

fn deserialize_secret<'de, D>(deserializer: D) -> Result<Option<SecretString>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.map(SecretString::from))
}

fn default_database_path() -> String {
    "database.sqlite".to_string()
}

fn default_log_file_path() -> String {
    "app.log".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Network configuration
#[derive(Debug, Deserialize)]
pub struct NetworkConfig {
    /// Request timeout for Bot API calls (in seconds)
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl NetworkConfig {
    /// Request timeout duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn default_request_timeout_secs() -> u64 {
    30
}

/// List and keyboard sizing
#[derive(Debug, Deserialize)]
pub struct DisplayConfig {
    /// Maximum number of records shown in a list screen
    #[serde(default = "default_max_list_items")]
    pub max_list_items: usize,
    /// Maximum number of search hits shown
    #[serde(default = "default_search_results_limit")]
    pub search_results_limit: usize,
    /// University buttons per keyboard row
    #[serde(default = "default_buttons_per_row")]
    pub buttons_per_row: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            max_list_items: default_max_list_items(),
            search_results_limit: default_search_results_limit(),
            buttons_per_row: default_buttons_per_row(),
        }
    }
}

impl DisplayConfig {
    fn validate(&self) -> AppResult<()> {
        if self.buttons_per_row == 0 {
            return Err(AppError::Validation("display.buttons_per_row must be at least 1".to_string()));
        }
        if self.max_list_items == 0 || self.search_results_limit == 0 {
            return Err(AppError::Validation("display limits must be at least 1".to_string()));
        }
        Ok(())
    }
}

fn default_max_list_items() -> usize {
    10
}

fn default_search_results_limit() -> usize {
    8
}

fn default_buttons_per_row() -> usize {
    2
}

/// Contacts shown on the support and payment screens
#[derive(Debug, Deserialize)]
pub struct SupportConfig {
    #[serde(default = "default_support_phone")]
    pub phone: String,
    #[serde(default = "default_support_email")]
    pub email: String,
    #[serde(default = "default_finance_email")]
    pub finance_email: String,
}

impl Default for SupportConfig {
    fn default() -> Self {
        Self {
            phone: default_support_phone(),
            email: default_support_email(),
            finance_email: default_finance_email(),
        }
    }
}

fn default_support_phone() -> String {
    "+7 (495) 123-45-67".to_string()
}

fn default_support_email() -> String {
    "support@university.ru".to_string()
}

fn default_finance_email() -> String {
    "finance@university.ru".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_sources() {
        let config = Config::from_figment(Figment::new()).unwrap();
        assert_eq!(config.database_path, "database.sqlite");
        assert_eq!(config.display.max_list_items, 10);
        assert_eq!(config.display.search_results_limit, 8);
        assert_eq!(config.display.buttons_per_row, 2);
        assert_eq!(config.network.timeout(), Duration::from_secs(30));
        assert!(config.bot_token.is_none());
    }

    #[test]
    fn test_missing_explicit_config_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("typo.toml");
        let err = Config::load(Some(missing.as_path())).unwrap_err();
        assert!(matches!(err, AppError::Validation(ref msg) if msg.contains("typo.toml")));
    }

    #[test]
    fn test_explicit_config_file_is_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("abiturbot.toml");
        std::fs::write(&path, "[display]\nsearch_results_limit = 3\n").unwrap();
        let config = Config::load(Some(path.as_path())).unwrap();
        assert_eq!(config.display.search_results_limit, 3);
    }

    #[test]
    fn test_toml_overrides_nested_sections() {
        let toml = r#"
            database_path = "/var/lib/abiturbot/db.sqlite"
            log_level = "debug"

            [display]
            max_list_items = 4
        "#;
        let config = Config::from_figment(Figment::new().merge(Toml::string(toml))).unwrap();
        assert_eq!(config.database_path, "/var/lib/abiturbot/db.sqlite");
        assert_eq!(config.display.max_list_items, 4);
        assert_eq!(config.display.buttons_per_row, 2);
        assert_eq!(config.log_level_filter(), log::LevelFilter::Debug);
    }

    #[test]
    fn test_zero_buttons_per_row_rejected() {
        let toml = "[display]\nbuttons_per_row = 0\n";
        let result = Config::from_figment(Figment::new().merge(Toml::string(toml)));
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_bot_token_validation() {
        let missing = Config::default();
        assert!(missing.validate_for_bot().is_err());

        let short = Config::from_figment(Figment::new().merge(Toml::string("bot_token = \"abc\""))).unwrap();
        assert!(short.validate_for_bot().is_err());

        let ok = Config::from_figment(Figment::new().merge(Toml::string("bot_token = \"123456:ABCDEFGHIJ\""))).unwrap();
        assert!(ok.validate_for_bot().is_ok());
    }

    #[test]
    fn test_unknown_log_level_falls_back_to_info() {
        let config = Config {
            log_level: "chatty".to_string(),
            ..Config::default()
        };
        assert_eq!(config.log_level_filter(), log::LevelFilter::Info);
    }
}
