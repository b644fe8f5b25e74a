//! Algorithm resolution and per-family key parsing
//!
//! An algorithm identifier is classified into a family (EC, RSA, EdDSA) by
//! prefix, and looked up by exact name to find the signing method. The family
//! decides which PEM parser runs; the method decides how the signature is
//! computed. Signing and verification share this single dispatch.

use std::fmt;

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{crypto, Algorithm, DecodingKey, EncodingKey};

use crate::errors::TokenError;

use super::{es512, sec1};

/// Family of signature algorithms sharing key format and math
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlgorithmFamily {
    /// ECDSA over NIST curves (`ES*`)
    Ec,
    /// RSA PKCS#1 v1.5 and PSS (`RS*`, `PS*`)
    Rsa,
    /// Edwards-curve (`EdDSA`)
    EdDsa,
    Unknown,
}

impl AlgorithmFamily {
    /// Classifies an identifier, checking EC, then RSA, then EdDSA
    ///
    /// EC and RSA prefixes are case-sensitive; the EdDSA check is done on
    /// the uppercased identifier.
    pub fn classify(id: &str) -> Self {
        if id.starts_with("ES") {
            AlgorithmFamily::Ec
        } else if id.starts_with("RS") || id.starts_with("PS") {
            AlgorithmFamily::Rsa
        } else if id.to_uppercase().starts_with("ED") {
            AlgorithmFamily::EdDsa
        } else {
            AlgorithmFamily::Unknown
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AlgorithmFamily::Ec => "EC",
            AlgorithmFamily::Rsa => "RSA",
            AlgorithmFamily::EdDsa => "EdDSA",
            AlgorithmFamily::Unknown => "unknown",
        }
    }
}

impl fmt::Display for AlgorithmFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Concrete signing method supported by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SigningMethod {
    Es256,
    Es384,
    Es512,
    Rs256,
    Rs384,
    Rs512,
    Ps256,
    Ps384,
    Ps512,
    EdDsa,
}

impl SigningMethod {
    pub const ALL: [SigningMethod; 10] = [
        SigningMethod::Es256,
        SigningMethod::Es384,
        SigningMethod::Es512,
        SigningMethod::Rs256,
        SigningMethod::Rs384,
        SigningMethod::Rs512,
        SigningMethod::Ps256,
        SigningMethod::Ps384,
        SigningMethod::Ps512,
        SigningMethod::EdDsa,
    ];

    /// Exact, case-sensitive lookup of a JOSE `alg` name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|method| method.name() == name)
    }

    /// JOSE `alg` name
    pub fn name(&self) -> &'static str {
        match self {
            SigningMethod::Es256 => "ES256",
            SigningMethod::Es384 => "ES384",
            SigningMethod::Es512 => "ES512",
            SigningMethod::Rs256 => "RS256",
            SigningMethod::Rs384 => "RS384",
            SigningMethod::Rs512 => "RS512",
            SigningMethod::Ps256 => "PS256",
            SigningMethod::Ps384 => "PS384",
            SigningMethod::Ps512 => "PS512",
            SigningMethod::EdDsa => "EdDSA",
        }
    }

    pub fn family(&self) -> AlgorithmFamily {
        AlgorithmFamily::classify(self.name())
    }

    // ES512 has no jsonwebtoken counterpart and goes through `es512`.
    fn jwt_algorithm(&self) -> Option<Algorithm> {
        match self {
            SigningMethod::Es256 => Some(Algorithm::ES256),
            SigningMethod::Es384 => Some(Algorithm::ES384),
            SigningMethod::Es512 => None,
            SigningMethod::Rs256 => Some(Algorithm::RS256),
            SigningMethod::Rs384 => Some(Algorithm::RS384),
            SigningMethod::Rs512 => Some(Algorithm::RS512),
            SigningMethod::Ps256 => Some(Algorithm::PS256),
            SigningMethod::Ps384 => Some(Algorithm::PS384),
            SigningMethod::Ps512 => Some(Algorithm::PS512),
            SigningMethod::EdDsa => Some(Algorithm::EdDSA),
        }
    }

    /// Parses a PEM private key with the parser of this method's family
    pub(crate) fn signing_key(&self, pem: &[u8]) -> Result<SigningKey, TokenError> {
        let family = self.family();
        let parsed = match (family, self.jwt_algorithm()) {
            (AlgorithmFamily::Ec, None) => return es512::signing_key(pem).map(SigningKey::P521),
            (AlgorithmFamily::Ec, Some(alg)) if sec1::is_sec1_pem(pem) => {
                return sec1::pkcs8_der(alg, pem)
                    .map(|der| SigningKey::Jwt(EncodingKey::from_ec_der(&der)))
                    .map_err(|e| invalid_key(family, e));
            }
            (AlgorithmFamily::Ec, Some(_)) => EncodingKey::from_ec_pem(pem),
            (AlgorithmFamily::Rsa, _) => EncodingKey::from_rsa_pem(pem),
            (AlgorithmFamily::EdDsa, _) => EncodingKey::from_ed_pem(pem),
            (AlgorithmFamily::Unknown, _) => return Err(self.unsupported()),
        };
        parsed
            .map(SigningKey::Jwt)
            .map_err(|e| invalid_key(family, e))
    }

    /// Parses a PEM public key with the parser of this method's family
    pub(crate) fn verifying_key(&self, pem: &[u8]) -> Result<VerifyingKey, TokenError> {
        let family = self.family();
        let parsed = match (family, self.jwt_algorithm()) {
            (AlgorithmFamily::Ec, None) => return es512::verifying_key(pem).map(VerifyingKey::P521),
            (AlgorithmFamily::Ec, Some(_)) => DecodingKey::from_ec_pem(pem),
            (AlgorithmFamily::Rsa, _) => DecodingKey::from_rsa_pem(pem),
            (AlgorithmFamily::EdDsa, _) => DecodingKey::from_ed_pem(pem),
            (AlgorithmFamily::Unknown, _) => return Err(self.unsupported()),
        };
        parsed
            .map(VerifyingKey::Jwt)
            .map_err(|e| invalid_key(family, e))
    }

    /// Signs `message`, returning the base64url signature segment
    pub(crate) fn sign(&self, message: &[u8], key: &SigningKey) -> Result<String, TokenError> {
        match (key, self.jwt_algorithm()) {
            (SigningKey::P521(key), None) => es512::sign(message, key),
            (SigningKey::Jwt(key), Some(alg)) => crypto::sign(message, key, alg)
                .map_err(|e| TokenError::TokenGenerationFailed {
                    message: e.to_string(),
                }),
            _ => Err(self.key_mismatch()),
        }
    }

    /// Checks a base64url signature segment over `message`
    pub(crate) fn verify(
        &self,
        signature: &str,
        message: &[u8],
        key: &VerifyingKey,
    ) -> Result<(), TokenError> {
        let valid = match (key, self.jwt_algorithm()) {
            (VerifyingKey::P521(key), None) => return es512::verify(signature, message, key),
            (VerifyingKey::Jwt(key), Some(alg)) => {
                crypto::verify(signature, message, key, alg).map_err(|e| match e.kind() {
                    ErrorKind::Base64(_) | ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                    _ => invalid_key(self.family(), e),
                })?
            }
            _ => return Err(self.key_mismatch()),
        };
        if valid {
            Ok(())
        } else {
            Err(TokenError::InvalidSignature)
        }
    }

    fn unsupported(&self) -> TokenError {
        TokenError::UnsupportedAlgorithm {
            algorithm: self.name().to_string(),
        }
    }

    fn key_mismatch(&self) -> TokenError {
        TokenError::InvalidKey {
            family: self.family().as_str(),
            message: format!("key was not parsed for {}", self.name()),
        }
    }
}

impl fmt::Display for SigningMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Private key parsed for one signing method
pub(crate) enum SigningKey {
    Jwt(EncodingKey),
    P521(p521::ecdsa::SigningKey),
}

/// Public key parsed for one signing method
pub(crate) enum VerifyingKey {
    Jwt(DecodingKey),
    P521(p521::ecdsa::VerifyingKey),
}

/// Configured algorithm, resolved once when the engine is opened
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAlgorithm {
    id: String,
    family: AlgorithmFamily,
    method: Option<SigningMethod>,
}

impl ResolvedAlgorithm {
    /// Resolves an identifier; unknown identifiers resolve without a method
    pub fn resolve(id: &str) -> Self {
        Self {
            id: id.to_string(),
            family: AlgorithmFamily::classify(id),
            method: SigningMethod::from_name(id),
        }
    }

    /// The identifier as configured
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn family(&self) -> AlgorithmFamily {
        self.family
    }

    pub fn method(&self) -> Option<SigningMethod> {
        self.method
    }

    pub fn is_supported(&self) -> bool {
        self.method.is_some()
    }

    /// The signing method, or `UnsupportedAlgorithm` if none was resolved
    pub fn require_method(&self) -> Result<SigningMethod, TokenError> {
        self.method.ok_or_else(|| TokenError::UnsupportedAlgorithm {
            algorithm: self.id.clone(),
        })
    }
}

fn invalid_key(family: AlgorithmFamily, err: impl fmt::Display) -> TokenError {
    TokenError::InvalidKey {
        family: family.as_str(),
        message: err.to_string(),
    }
}
