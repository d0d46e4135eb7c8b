//! Configuration file support for arxiv-daily.
//!
//! # Configuration File Format
//!
//! ```toml
//! [feed]
//! base_url = "https://export.arxiv.org/api/query"
//! default_category = "cs.CV"
//! default_count = 10
//! timeout_secs = 30
//! connect_timeout_secs = 10
//!
//! [translation]
//! api_url = "https://api.siliconflow.cn/v1/chat/completions"
//! api_key = "your-api-key"
//! model = "deepseek-ai/DeepSeek-V3"
//! target_language = "Chinese"
//!
//! [logging]
//! level = "info"
//! format = "json"
//! ```

use std::path::{Path, PathBuf};

use super::Config;

/// File name looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "arxiv-daily.toml";

impl Config {
    /// Load configuration from a TOML file, without environment overrides
    pub fn load_file(path: &Path) -> Result<Self, ConfigFileError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigFileError::Io(e.to_string()))?;

        toml::from_str(&content).map_err(|e| ConfigFileError::Parse(e.to_string()))
    }

    /// Save configuration to a TOML file, creating parent directories
    pub fn save(&self, path: &Path) -> Result<(), ConfigFileError> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigFileError::Serialize(e.to_string()))?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| ConfigFileError::Io(e.to_string()))?;
        }
        std::fs::write(path, content).map_err(|e| ConfigFileError::Io(e.to_string()))
    }
}

/// `<config_dir>/arxiv-daily/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("arxiv-daily").join("config.toml"))
}

/// First existing configuration file: working directory, then the user
/// config directory
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.is_file() {
        return Some(local);
    }
    default_config_path().filter(|p| p.is_file())
}

/// Configuration file errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigFileError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Serialize error: {0}")]
    Serialize(String),
}
