//! Error types for the imgdownloader application.

use thiserror::Error;

/// Main error type for the application.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration value for '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    #[error("Missing required configuration: {0}")]
    MissingConfig(String),

    // Registry errors
    #[error("Undefined provider: {0}")]
    UnknownProvider(String),

    // Provider search errors
    #[error("{provider} API error: {message}")]
    Upstream { provider: String, message: String },

    // Per-item download errors
    #[error("Fetch failed: {0}")]
    Fetch(String),

    #[error("Write failed: {0}")]
    Persist(String),

    #[error("Download cancelled")]
    Cancelled,

    // File system errors
    #[error("Invalid filename (path traversal attempt): {0}")]
    InvalidFilename(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    // URL parsing errors
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),
}

impl Error {
    /// Build an upstream error for the named provider.
    pub fn upstream(provider: &str, message: impl Into<String>) -> Self {
        Error::Upstream {
            provider: provider.to_string(),
            message: message.into(),
        }
    }
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Process exit codes.
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const FAILURE: i32 = 1;
    pub const SOME_DOWNLOADS_FAILED: i32 = 2;
}
