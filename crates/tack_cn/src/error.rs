//! Error types for tack_cn

use thiserror::Error;

/// Errors raised while configuring components
#[derive(Error, Debug)]
pub enum TackError {
    /// Failed to read a configuration file
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file is not valid TOML for `ComponentConfig`
    #[error("Invalid config: {0}")]
    Config(#[from] toml::de::Error),

    /// Unknown menu mode name
    #[error("Unknown menu mode: {0} (expected vertical, horizontal or inline)")]
    InvalidMode(String),

    /// Unknown theme name
    #[error("Unknown theme: {0} (expected light or dark)")]
    InvalidTheme(String),
}

/// Result type for tack_cn operations
pub type Result<T> = std::result::Result<T, TackError>;
