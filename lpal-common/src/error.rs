//! Common error types for LanguagePal

use thiserror::Error;

/// Common result type for LanguagePal operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across LanguagePal crates
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Session token could not be encoded or decoded
    #[error("Session error: {0}")]
    Session(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Message without the variant prefix, suitable for showing to users
    pub fn user_message(&self) -> String {
        match self {
            Error::NotFound(msg)
            | Error::InvalidInput(msg)
            | Error::Config(msg)
            | Error::Session(msg)
            | Error::Internal(msg) => msg.clone(),
            Error::Io(err) => err.to_string(),
        }
    }
}
