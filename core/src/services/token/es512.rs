//! ES512 (ECDSA P-521 / SHA-512) signing and verification
//!
//! The signature segment is the fixed-width `r || s` encoding (132 bytes)
//! required by JWS, not DER.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use p521::ecdsa::signature::{Signer, Verifier};
use p521::ecdsa::{Signature, SigningKey, VerifyingKey};
use p521::pkcs8::{DecodePrivateKey, DecodePublicKey};
use p521::{PublicKey, SecretKey};

use crate::errors::TokenError;

/// Parses a P-521 private key from PKCS#8 or SEC1 PEM
pub(crate) fn signing_key(pem: &[u8]) -> Result<SigningKey, TokenError> {
    let pem = pem_str(pem)?;
    let secret = SecretKey::from_pkcs8_pem(pem)
        .or_else(|_| SecretKey::from_sec1_pem(pem))
        .map_err(|e| invalid_key(format!("not a P-521 private key: {}", e)))?;
    SigningKey::from_bytes(&secret.to_bytes()).map_err(|e| invalid_key(e.to_string()))
}

/// Parses a P-521 public key from SPKI PEM
pub(crate) fn verifying_key(pem: &[u8]) -> Result<VerifyingKey, TokenError> {
    let pem = pem_str(pem)?;
    let public = PublicKey::from_public_key_pem(pem)
        .map_err(|e| invalid_key(format!("not a P-521 public key: {}", e)))?;
    VerifyingKey::from_affine(*public.as_affine()).map_err(|e| invalid_key(e.to_string()))
}

pub(crate) fn sign(message: &[u8], key: &SigningKey) -> Result<String, TokenError> {
    let signature: Signature = key
        .try_sign(message)
        .map_err(|e| TokenError::TokenGenerationFailed {
            message: e.to_string(),
        })?;
    Ok(URL_SAFE_NO_PAD.encode(signature.to_bytes()))
}

pub(crate) fn verify(signature: &str, message: &[u8], key: &VerifyingKey) -> Result<(), TokenError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(signature)
        .map_err(|_| TokenError::InvalidSignature)?;
    let signature = Signature::from_slice(&bytes).map_err(|_| TokenError::InvalidSignature)?;
    key.verify(message, &signature)
        .map_err(|_| TokenError::InvalidSignature)
}

fn pem_str(pem: &[u8]) -> Result<&str, TokenError> {
    std::str::from_utf8(pem).map_err(|_| invalid_key("PEM is not valid UTF-8".to_string()))
}

fn invalid_key(message: String) -> TokenError {
    TokenError::InvalidKey {
        family: "EC",
        message,
    }
}
