//! Configuration management.

mod file_config;

pub use file_config::{default_config_path, find_config_file, ConfigFileError, CONFIG_FILE_NAME};

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::feed::ARXIV_API_URL;
use crate::models::{DEFAULT_CATEGORY, DEFAULT_MAX_RESULTS};
use crate::translate::{TranslationMethod, DEFAULT_MODEL, SILICONFLOW_API_URL};

/// Environment variable prefix, e.g. `ARXIV_DAILY_FEED__TIMEOUT_SECS=5`
pub const ENV_PREFIX: &str = "ARXIV_DAILY";

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Feed settings
    #[serde(default)]
    pub feed: FeedConfig,

    /// Abstract translation settings
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Feed request configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// arXiv query endpoint
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Category used when none is given on the command line
    #[serde(default = "default_category")]
    pub default_category: String,

    /// Result count used when none is given on the command line
    #[serde(default = "default_count")]
    pub default_count: usize,

    /// Whole-request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Connection timeout
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            default_category: default_category(),
            default_count: default_count(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

impl FeedConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

fn default_base_url() -> String {
    ARXIV_API_URL.to_string()
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

fn default_count() -> usize {
    DEFAULT_MAX_RESULTS
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

/// Translation service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationConfig {
    /// Backend: `siliconflow` or `youdao`
    #[serde(default)]
    pub method: TranslationMethod,

    /// Chat-completions endpoint
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Bearer token (falls back to `SILICONFLOW_API_KEY`)
    #[serde(default)]
    pub api_key: Option<String>,

    /// Model identifier
    #[serde(default = "default_model")]
    pub model: String,

    /// Default target language label
    #[serde(default = "default_target_language")]
    pub target_language: String,

    /// Request timeout; translation of long abstracts is slow
    #[serde(default = "default_translation_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            method: TranslationMethod::default(),
            api_url: default_api_url(),
            api_key: std::env::var("SILICONFLOW_API_KEY").ok(),
            model: default_model(),
            target_language: default_target_language(),
            timeout_secs: default_translation_timeout_secs(),
        }
    }
}

impl TranslationConfig {
    /// API key from the file, or from the environment when the file has none
    pub fn resolved_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| std::env::var("SILICONFLOW_API_KEY").ok())
            .filter(|k| !k.trim().is_empty())
    }

    /// API key with all but the last four characters hidden
    pub fn masked_api_key(&self) -> String {
        match self.resolved_api_key() {
            Some(key) if key.chars().count() > 4 => {
                let tail: String = key.chars().skip(key.chars().count() - 4).collect();
                format!("****{}", tail)
            }
            Some(_) => "****".to_string(),
            None => "(not set)".to_string(),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_api_url() -> String {
    SILICONFLOW_API_URL.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_target_language() -> String {
    "Chinese".to_string()
}

fn default_translation_timeout_secs() -> u64 {
    120
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// `"json"` for structured output, plain text otherwise
    #[serde(default)]
    pub format: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: None,
        }
    }
}

impl LoggingConfig {
    pub fn is_json(&self) -> bool {
        self.format
            .as_deref()
            .is_some_and(|f| f.eq_ignore_ascii_case("json"))
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Load configuration from a file, with `ARXIV_DAILY_*` environment overrides
pub fn load_config(path: &Path) -> Result<Config, config::ConfigError> {
    build_config(Some(path))
}

/// Get the configuration from environment overrides and defaults only
pub fn get_config() -> Result<Config, config::ConfigError> {
    build_config(None)
}

fn build_config(path: Option<&Path>) -> Result<Config, config::ConfigError> {
    let mut builder = config::Config::builder();
    if let Some(path) = path {
        builder = builder.add_source(config::File::from(path));
    }
    let settings = builder
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.feed.base_url, "https://export.arxiv.org/api/query");
        assert_eq!(config.feed.default_category, "cs.CV");
        assert_eq!(config.feed.default_count, 10);
        assert_eq!(config.feed.timeout(), Duration::from_secs(30));
        assert_eq!(config.translation.model, "deepseek-ai/DeepSeek-V3");
        assert_eq!(config.translation.method, TranslationMethod::SiliconFlow);
        assert_eq!(config.logging.level, "info");
        assert!(!config.logging.is_json());
    }

    #[test]
    fn test_load_config_with_partial_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[feed]
default_category = "cs.RO"
timeout_secs = 5

[logging]
format = "json"
"#
        )
        .unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.feed.default_category, "cs.RO");
        assert_eq!(config.feed.timeout_secs, 5);
        // Untouched keys keep their defaults
        assert_eq!(config.feed.default_count, 10);
        assert_eq!(config.feed.connect_timeout_secs, 10);
        assert!(config.logging.is_json());
    }

    #[test]
    fn test_load_translation_method() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[translation]
method = "youdao"
"#
        )
        .unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.translation.method, TranslationMethod::Youdao);
        assert_eq!(config.translation.model, "deepseek-ai/DeepSeek-V3");
    }

    #[test]
    fn test_masked_api_key() {
        let mut translation = TranslationConfig {
            api_key: Some("sk-abcdef123456".to_string()),
            ..Default::default()
        };
        assert_eq!(translation.masked_api_key(), "****3456");

        translation.api_key = Some("abc".to_string());
        assert_eq!(translation.masked_api_key(), "****");
    }
}
