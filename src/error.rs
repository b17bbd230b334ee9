use crate::checkout::CheckoutError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    Config {
        message: String,
        path: Option<PathBuf>,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Project lookup failed for '{key}': {message}")]
    Lookup { key: String, message: String },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Checkout(#[from] CheckoutError),
}

impl Error {
    /// Create a configuration error tied to a file
    pub fn config_at(message: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::Config {
            message: message.into(),
            path: Some(path.into()),
        }
    }

    /// Create a configuration error without a source file
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            path: None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
