//! Business services containing the token engine.

pub mod token;

// Re-export commonly used types
pub use token::{
    decode_unverified, AlgorithmFamily, KeyStore, ResolvedAlgorithm, SigningMethod, TokenEngine,
};
