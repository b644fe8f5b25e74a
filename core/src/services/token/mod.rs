//! Token service module for JWT management
//!
//! This module handles all token operations over asymmetric keys:
//! - Key material loading (raw PEM bytes, parsed per algorithm family)
//! - Algorithm resolution for the EC, RSA and EdDSA families
//! - Default claim injection
//! - Signing, verification and unverified decoding of compact tokens

mod algorithm;
mod claims;
mod compact;
mod engine;
mod es512;
mod key_store;
mod sec1;

#[cfg(test)]
mod tests;

pub use algorithm::{AlgorithmFamily, ResolvedAlgorithm, SigningMethod};
pub use claims::{default_claims, merge_claims};
pub use compact::{decode_segment, encode_segment, split_compact, CompactParts};
pub use engine::{decode_unverified, TokenEngine};
pub use key_store::KeyStore;
