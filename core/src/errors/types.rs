//! Token error types
//!
//! Every failure of the token engine is one of these variants, so callers can
//! tell a bad signature from a bad key configuration from an expired token
//! without looking at message text.

use thiserror::Error;

/// Token-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Invalid token format: {reason}")]
    InvalidTokenFormat { reason: String },

    #[error("Token signature verification failed")]
    InvalidSignature,

    #[error("Token expired")]
    TokenExpired,

    #[error("Token not yet valid")]
    TokenNotYetValid,

    #[error("Invalid token claims: {reason}")]
    InvalidClaims { reason: String },

    #[error("Token issuer does not match")]
    InvalidIssuer,

    #[error("Token audience does not match")]
    InvalidAudience,

    #[error("Invalid {family} key: {message}")]
    InvalidKey { family: &'static str, message: String },

    #[error("Unsupported signing algorithm: {algorithm}")]
    UnsupportedAlgorithm { algorithm: String },

    #[error("Token algorithm {found} does not match configured algorithm {expected}")]
    AlgorithmMismatch { expected: String, found: String },

    #[error("Error signing token: {message}")]
    TokenGenerationFailed { message: String },
}

impl TokenError {
    /// Shorthand for a format error
    pub fn format(reason: impl Into<String>) -> Self {
        TokenError::InvalidTokenFormat {
            reason: reason.into(),
        }
    }

    /// Stable machine-readable error code
    pub fn code(&self) -> &'static str {
        match self {
            TokenError::InvalidTokenFormat { .. } => "INVALID_TOKEN_FORMAT",
            TokenError::InvalidSignature => "INVALID_SIGNATURE",
            TokenError::TokenExpired => "TOKEN_EXPIRED",
            TokenError::TokenNotYetValid => "TOKEN_NOT_YET_VALID",
            TokenError::InvalidClaims { .. } => "INVALID_CLAIMS",
            TokenError::InvalidIssuer => "INVALID_ISSUER",
            TokenError::InvalidAudience => "INVALID_AUDIENCE",
            TokenError::InvalidKey { .. } => "INVALID_KEY",
            TokenError::UnsupportedAlgorithm { .. } => "UNSUPPORTED_ALGORITHM",
            TokenError::AlgorithmMismatch { .. } => "ALGORITHM_MISMATCH",
            TokenError::TokenGenerationFailed { .. } => "TOKEN_GENERATION_FAILED",
        }
    }

    /// Malformed input: segment count, base64 or JSON
    pub fn is_format_error(&self) -> bool {
        matches!(self, TokenError::InvalidTokenFormat { .. })
    }

    /// Key, algorithm or signature problems
    pub fn is_crypto_error(&self) -> bool {
        matches!(
            self,
            TokenError::InvalidSignature
                | TokenError::InvalidKey { .. }
                | TokenError::UnsupportedAlgorithm { .. }
                | TokenError::AlgorithmMismatch { .. }
                | TokenError::TokenGenerationFailed { .. }
        )
    }

    /// Signature was fine but a claim check rejected the token
    pub fn is_claim_error(&self) -> bool {
        matches!(
            self,
            TokenError::TokenExpired
                | TokenError::TokenNotYetValid
                | TokenError::InvalidClaims { .. }
                | TokenError::InvalidIssuer
                | TokenError::InvalidAudience
        )
    }
}
