//! Configuration module
//!
//! - `jwt` - Key material locations, algorithm and default claim settings
//! - `logging` - Log level and output format for the boundary layer

pub mod jwt;
pub mod logging;

// Re-export commonly used types
pub use jwt::{JwtConfig, DEFAULT_ALGORITHM, DEFAULT_EXPIRY_MINUTES};
pub use logging::{init_logging, LogFormat, LoggingConfig};
