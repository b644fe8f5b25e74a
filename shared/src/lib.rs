//! Shared configuration types for the NodeAgent token engine
//!
//! This crate holds the configuration surface consumed by the engine and by
//! whatever boundary layer (CLI, service) constructs it:
//! - JWT engine configuration (key paths, algorithm, default claims)
//! - Logging configuration and subscriber setup

pub mod config;

// Re-export commonly used items at crate root
pub use config::{init_logging, JwtConfig, LogFormat, LoggingConfig};
