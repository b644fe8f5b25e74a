//! JWT engine configuration

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, File, FileFormat};
use serde::{Deserialize, Serialize};

/// Algorithm used when none is configured
pub const DEFAULT_ALGORITHM: &str = "ES512";

/// Default token lifetime, in minutes
pub const DEFAULT_EXPIRY_MINUTES: i64 = 30;

/// Configuration for the token engine
///
/// Built once by the boundary layer and handed to the engine by value.
/// Nothing in here is read from the process environment.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct JwtConfig {
    /// Path to the PEM-encoded private key (signing)
    pub private_key_path: PathBuf,

    /// Path to the PEM-encoded public key (verification)
    pub public_key_path: PathBuf,

    /// Algorithm identifier, e.g. `ES512`, `RS256`, `PS384`, `EdDSA`
    pub algorithm: String,

    /// Issuer injected as `iss` when non-empty
    pub issuer: String,

    /// Audience injected as `aud` when non-empty
    pub audience: String,

    /// Default expiry in minutes (not seconds)
    pub default_expiry_minutes: i64,

    /// Clock skew tolerated when checking `exp`, `nbf` and `iat`
    pub leeway_seconds: u64,

    /// Reject tokens whose `iss` differs from `issuer`
    pub validate_issuer: bool,

    /// Reject tokens whose `aud` does not contain `audience`
    pub validate_audience: bool,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            private_key_path: PathBuf::new(),
            public_key_path: PathBuf::new(),
            algorithm: String::from(DEFAULT_ALGORITHM),
            issuer: String::new(),
            audience: String::new(),
            default_expiry_minutes: DEFAULT_EXPIRY_MINUTES,
            leeway_seconds: 0,
            validate_issuer: false,
            validate_audience: false,
        }
    }
}

impl JwtConfig {
    /// Create a configuration for the given key pair with default settings
    pub fn new(private_key_path: impl Into<PathBuf>, public_key_path: impl Into<PathBuf>) -> Self {
        Self {
            private_key_path: private_key_path.into(),
            public_key_path: public_key_path.into(),
            ..Default::default()
        }
    }

    /// Set the algorithm identifier
    pub fn with_algorithm(mut self, algorithm: impl Into<String>) -> Self {
        self.algorithm = algorithm.into();
        self
    }

    /// Set the issuer injected into default claims
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = issuer.into();
        self
    }

    /// Set the audience injected into default claims
    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.audience = audience.into();
        self
    }

    /// Set the default expiry in minutes
    pub fn with_expiry_minutes(mut self, minutes: i64) -> Self {
        self.default_expiry_minutes = minutes;
        self
    }

    /// Set the clock skew tolerance used on verification
    pub fn with_leeway(mut self, seconds: u64) -> Self {
        self.leeway_seconds = seconds;
        self
    }

    /// Enforce the configured issuer on verification
    pub fn require_issuer(mut self) -> Self {
        self.validate_issuer = true;
        self
    }

    /// Enforce the configured audience on verification
    pub fn require_audience(mut self) -> Self {
        self.validate_audience = true;
        self
    }

    /// Default expiry offset in seconds
    ///
    /// The configured value is in minutes; this is the single place where
    /// it gets converted.
    pub fn default_expiry_seconds(&self) -> i64 {
        self.default_expiry_minutes.saturating_mul(60)
    }

    /// Load the configuration from a file (TOML, JSON, YAML, ... by extension)
    ///
    /// Fields missing from the file keep their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let config: Self = Config::builder()
            .add_source(File::from(path))
            .build()?
            .try_deserialize()?;
        tracing::debug!(path = %path.display(), algorithm = %config.algorithm, "Loaded JWT configuration");
        Ok(config)
    }

    /// Load the configuration from an in-memory TOML document
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from_str(contents, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }
}
