//! # NodeAgent Core
//!
//! Token engine for the NodeAgent: issues, verifies and inspects signed JWTs
//! over ES*, RS*/PS* and EdDSA key pairs loaded from PEM files.
//! This crate contains the token entities, the engine and its error types.

pub mod domain;
pub mod errors;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use services::*;
