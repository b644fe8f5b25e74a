//! Domain-specific error types and error handling.

mod types;

#[cfg(test)]
mod tests;

pub use types::TokenError;

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Core domain errors
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Failed to read key file {}: {source}", path.display())]
    KeyFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    // Bridge to token errors
    #[error(transparent)]
    Token(#[from] TokenError),
}

impl DomainError {
    /// Stable machine-readable error code
    pub fn code(&self) -> &'static str {
        match self {
            DomainError::Configuration { .. } => "CONFIGURATION_ERROR",
            DomainError::KeyFile { .. } => "KEY_FILE_ERROR",
            DomainError::Token(err) => err.code(),
        }
    }

    /// Returns the token error, if this is one
    pub fn as_token_error(&self) -> Option<&TokenError> {
        match self {
            DomainError::Token(err) => Some(err),
            _ => None,
        }
    }

    /// Missing or unreadable key files, bad configuration values
    pub fn is_precondition_error(&self) -> bool {
        matches!(self, DomainError::Configuration { .. } | DomainError::KeyFile { .. })
    }

    pub fn is_format_error(&self) -> bool {
        self.as_token_error().is_some_and(TokenError::is_format_error)
    }

    pub fn is_crypto_error(&self) -> bool {
        self.as_token_error().is_some_and(TokenError::is_crypto_error)
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
