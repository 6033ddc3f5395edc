use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use super::expand_path;

use crate::view::Theme;

#[derive(Debug, Deserialize, Serialize, Default, Clone)]
pub struct Config {
    #[serde(default)]
    pub api: ApiSettings,
    #[serde(default)]
    pub display: DisplaySettings,
    #[serde(default)]
    pub export: ExportSettings,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ApiSettings {
    /// Base address of the reporting API, without the `/api` suffix
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ApiSettings {
    /// Longest request timeout honoured; larger values are clamped to it
    pub const MAX_TIMEOUT_SECS: u64 = 24 * 60 * 60;

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.min(Self::MAX_TIMEOUT_SECS))
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DisplaySettings {
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
    #[serde(default = "default_thousands_separator")]
    pub thousands_separator: char,
    #[serde(default = "default_date_format")]
    pub date_format: String,
    #[serde(default)]
    pub theme: Theme,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            currency_symbol: default_currency_symbol(),
            thousands_separator: default_thousands_separator(),
            date_format: default_date_format(),
            theme: Theme::default(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ExportSettings {
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    #[serde(default = "default_file_name")]
    pub file_name: String,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            file_name: default_file_name(),
        }
    }
}

impl ExportSettings {
    /// Where an export lands when no explicit path is given
    pub fn default_path(&self) -> PathBuf {
        expand_path(&self.output_dir).join(&self.file_name)
    }
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_currency_symbol() -> String {
    "Rp".to_string()
}

fn default_thousands_separator() -> char {
    '.'
}

fn default_date_format() -> String {
    "%d/%m/%Y".to_string()
}

fn default_output_dir() -> String {
    ".".to_string()
}

fn default_file_name() -> String {
    crate::export::DEFAULT_FILE_NAME.to_string()
}
