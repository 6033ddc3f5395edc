use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Config directory not found at {0}. Run 'koperasi init' or pass --base-url.")]
    ConfigNotFound(PathBuf),

    #[error("Config file not found: {0}")]
    ConfigFileNotFound(PathBuf),

    #[error("Failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config directory already exists at {0}")]
    AlreadyInitialized(PathBuf),

    #[error("No API base URL configured. Set [api].base_url or pass --base-url.")]
    MissingBaseUrl,

    #[error("Request to {url} failed: {reason}")]
    Transport { url: String, reason: String },

    #[error("Unexpected response from {url}: {source}")]
    MalformedResponse {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Payment history could not be loaded")]
    HistoryUnavailable,

    #[error("Invalid status '{0}'. Expected one of: all, sukses, pending, failed")]
    InvalidStatus(String),

    #[error("Unknown command '{0}'. Type 'help' for the list of commands.")]
    UnknownCommand(String),

    #[error("Invalid filter '{0}'. Expected key=value with key search, status or jenis")]
    InvalidFilter(String),

    #[error("Export is only available while filtering by status SUKSES (use --status sukses)")]
    ExportRequiresSuccessFilter,

    #[error("Failed to write spreadsheet: {0}")]
    Export(#[from] rust_xlsxwriter::XlsxError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, LedgerError>;
