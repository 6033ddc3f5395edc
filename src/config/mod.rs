mod settings;

pub use settings::{ApiSettings, Config, DisplaySettings, ExportSettings};

use crate::error::{LedgerError, Result};
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};

/// Get the config directory path (XDG-style, falling back to ~/.koperasi/)
pub fn config_dir() -> Result<PathBuf> {
    if let Some(proj_dirs) = ProjectDirs::from("", "", "koperasi") {
        return Ok(proj_dirs.config_dir().to_path_buf());
    }

    let home = dirs_home().ok_or_else(|| {
        LedgerError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Could not determine home directory",
        ))
    })?;

    Ok(home.join(".koperasi"))
}

fn dirs_home() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

/// Expand ~ in paths
pub fn expand_path(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs_home() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

/// Load config.toml from the config directory
pub fn load_config(config_dir: &Path) -> Result<Config> {
    if !config_dir.exists() {
        return Err(LedgerError::ConfigNotFound(config_dir.to_path_buf()));
    }
    let path = config_dir.join("config.toml");
    if !path.exists() {
        return Err(LedgerError::ConfigFileNotFound(path));
    }
    let content = fs::read_to_string(&path)?;
    toml::from_str(&content).map_err(|e| LedgerError::ConfigParse { path, source: e })
}

/// Load config.toml, or fall back to defaults when a base URL override is
/// supplied and no config directory exists yet.
pub fn resolve_config(config_dir: &Path, base_url: Option<&str>) -> Result<Config> {
    let mut config = match load_config(config_dir) {
        Ok(config) => config,
        Err(LedgerError::ConfigNotFound(_)) | Err(LedgerError::ConfigFileNotFound(_))
            if base_url.is_some() =>
        {
            Config::default()
        }
        Err(e) => return Err(e),
    };

    if let Some(url) = base_url {
        config.api.base_url = Some(url.to_string());
    }

    Ok(config)
}

/// Write the template config into a fresh directory
pub fn init_config_dir(config_dir: &Path) -> Result<PathBuf> {
    if config_dir.exists() {
        return Err(LedgerError::AlreadyInitialized(config_dir.to_path_buf()));
    }

    fs::create_dir_all(config_dir)?;
    let path = config_dir.join("config.toml");
    fs::write(&path, CONFIG_TEMPLATE)?;
    Ok(path)
}

/// Template content for config.toml
pub const CONFIG_TEMPLATE: &str = r#"[api]
base_url = "https://koperasi.example.id"   # reporting API host, without /api
timeout_secs = 10

[display]
currency_symbol = "Rp"
thousands_separator = "."
date_format = "%d/%m/%Y"
theme = "plain"                            # plain, light or dark

[export]
output_dir = "~/koperasi"
file_name = "transaksi_sukses_koperasi.xlsx"
"#;
