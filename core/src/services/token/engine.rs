//! Token engine: sign, verify and show

use chrono::Utc;
use na_shared::JwtConfig;
use serde_json::Value;

use crate::domain::entities::token::{
    numeric_date, ClaimSet, DecodedToken, TokenHeader, CLAIM_AUD, CLAIM_EXP, CLAIM_IAT, CLAIM_ISS,
    CLAIM_NBF,
};
use crate::errors::{DomainResult, TokenError};

use super::algorithm::ResolvedAlgorithm;
use super::claims::{default_claims, merge_claims};
use super::compact::{encode_segment, signing_input, split_compact};
use super::key_store::KeyStore;

/// Issues, verifies and inspects signed tokens
///
/// An engine only exists once its key material is loaded, so every
/// operation runs against an opened engine. It is immutable afterwards and
/// can be shared between threads; re-opening means building a new engine.
#[derive(Debug, Clone)]
pub struct TokenEngine {
    config: JwtConfig,
    keys: KeyStore,
    algorithm: ResolvedAlgorithm,
}

impl TokenEngine {
    /// Loads the key files named in `config` and resolves the algorithm
    ///
    /// # Arguments
    ///
    /// * `config` - Engine configuration
    ///
    /// # Returns
    ///
    /// * `Ok(TokenEngine)` - Keys loaded; an unknown algorithm is not an error here
    /// * `Err(DomainError)` - A key path is empty or a key file cannot be read
    ///
    /// # Example
    ///
    /// ```no_run
    /// use na_core::services::token::TokenEngine;
    /// use na_shared::JwtConfig;
    ///
    /// let config = JwtConfig::new("keys/ec_private.pem", "keys/ec_public.pem")
    ///     .with_algorithm("ES512")
    ///     .with_issuer("nodeagent");
    /// let engine = TokenEngine::open(config).expect("Failed to load keys");
    /// let token = engine.sign(Default::default()).expect("Failed to sign");
    /// engine.verify(&token).expect("Token rejected");
    /// ```
    pub fn open(config: JwtConfig) -> DomainResult<Self> {
        let keys = KeyStore::load(&config.private_key_path, &config.public_key_path)?;
        Ok(Self::from_parts(config, keys))
    }

    /// Builds an engine from already loaded key material
    pub fn from_parts(config: JwtConfig, keys: KeyStore) -> Self {
        let algorithm = ResolvedAlgorithm::resolve(&config.algorithm);
        match algorithm.method() {
            Some(method) => tracing::debug!(
                algorithm = %method,
                family = %algorithm.family(),
                "Resolved signing method"
            ),
            None => tracing::warn!(
                algorithm = %algorithm.id(),
                "Unsupported signing algorithm, sign and verify will fail"
            ),
        }

        Self {
            config,
            keys,
            algorithm,
        }
    }

    pub fn config(&self) -> &JwtConfig {
        &self.config
    }

    pub fn algorithm(&self) -> &ResolvedAlgorithm {
        &self.algorithm
    }

    pub fn keys(&self) -> &KeyStore {
        &self.keys
    }

    /// Default claims for a token issued now
    pub fn default_claims(&self) -> ClaimSet {
        default_claims(&self.config, now())
    }

    /// Signs `claims` merged over the default claims
    ///
    /// Caller claims win on collision, so a caller may override `exp` and `iat`.
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The compact token
    /// * `Err(TokenError::UnsupportedAlgorithm)` - No signing method for the configured id
    /// * `Err(TokenError::InvalidKey)` - Private key is not valid PEM for the family
    /// * `Err(TokenError::TokenGenerationFailed)` - The signing primitive failed
    pub fn sign(&self, claims: ClaimSet) -> DomainResult<String> {
        self.sign_at(claims, now())
    }

    pub(crate) fn sign_at(&self, claims: ClaimSet, now: i64) -> DomainResult<String> {
        let payload = merge_claims(default_claims(&self.config, now), claims);

        let method = self.algorithm.require_method()?;
        let key = method.signing_key(self.keys.private_pem())?;

        let header = TokenHeader::new(method.name());
        let input = signing_input(&encode_segment(&header)?, &encode_segment(&payload)?);
        let signature = method.sign(input.as_bytes(), &key)?;

        tracing::debug!(algorithm = %method, claims = payload.len(), "Signed token");
        Ok(format!("{}.{}", input, signature))
    }

    /// Verifies the signature and time claims of `token` and decodes it
    ///
    /// The signature is always checked with the locally configured method;
    /// a token whose header names another algorithm is rejected with
    /// `AlgorithmMismatch` before any key is touched.
    ///
    /// # Returns
    ///
    /// * `Ok(DecodedToken)` - Signature valid and claims accepted
    /// * `Err(TokenError::InvalidTokenFormat)` - Not a three-segment token, bad base64 or JSON
    /// * `Err(TokenError::InvalidSignature)` - Signature does not match
    /// * `Err(TokenError::TokenExpired)` - `exp` is in the past
    pub fn verify(&self, token: &str) -> DomainResult<DecodedToken> {
        self.verify_at(token, now())
    }

    pub(crate) fn verify_at(&self, token: &str, now: i64) -> DomainResult<DecodedToken> {
        let parts = split_compact(token)?;
        let header = parts.decode_header()?;
        let alg = header
            .alg()
            .ok_or_else(|| TokenError::format("header has no string alg"))?;

        let method = self.algorithm.require_method()?;
        if alg != method.name() {
            tracing::debug!(expected = %method, found = %alg, "Rejected token algorithm");
            return Err(TokenError::AlgorithmMismatch {
                expected: method.name().to_string(),
                found: alg.to_string(),
            }
            .into());
        }

        let key = method.verifying_key(self.keys.public_pem())?;
        method.verify(parts.signature, parts.signing_input().as_bytes(), &key)?;

        // Claims are only parsed once the signature holds
        let claims = parts.decode_claims()?;
        self.validate_claims(&claims, now)?;

        tracing::debug!(algorithm = %method, "Verified token");
        Ok(DecodedToken {
            header,
            claims,
            signature: parts.signature.to_string(),
        })
    }

    /// Decodes `token` without checking its signature or claims
    ///
    /// For inspection only; the result is not authenticated.
    pub fn show(&self, token: &str) -> DomainResult<DecodedToken> {
        decode_unverified(token)
    }

    fn validate_claims(&self, claims: &ClaimSet, now: i64) -> Result<(), TokenError> {
        let leeway = i64::try_from(self.config.leeway_seconds).unwrap_or(i64::MAX);

        if let Some(exp) = time_claim(claims, CLAIM_EXP)? {
            if now > exp.saturating_add(leeway) {
                return Err(TokenError::TokenExpired);
            }
        }
        for name in [CLAIM_NBF, CLAIM_IAT] {
            if let Some(at) = time_claim(claims, name)? {
                if at > now.saturating_add(leeway) {
                    return Err(TokenError::TokenNotYetValid);
                }
            }
        }

        if self.config.validate_issuer
            && claims.get(CLAIM_ISS).and_then(Value::as_str) != Some(self.config.issuer.as_str())
        {
            return Err(TokenError::InvalidIssuer);
        }
        if self.config.validate_audience && !audience_matches(claims.get(CLAIM_AUD), &self.config.audience) {
            return Err(TokenError::InvalidAudience);
        }
        Ok(())
    }
}

/// Decodes header and claims of a compact token without any verification
pub fn decode_unverified(token: &str) -> DomainResult<DecodedToken> {
    Ok(split_compact(token)?.decode()?)
}

fn time_claim(claims: &ClaimSet, name: &str) -> Result<Option<i64>, TokenError> {
    match claims.get(name) {
        None => Ok(None),
        Some(value) => numeric_date(value)
            .map(Some)
            .ok_or_else(|| TokenError::InvalidClaims {
                reason: format!("{} is not a numeric date", name),
            }),
    }
}

// `aud` may be a single string or an array of strings
fn audience_matches(aud: Option<&Value>, expected: &str) -> bool {
    match aud {
        Some(Value::String(aud)) => aud == expected,
        Some(Value::Array(values)) => values.iter().any(|v| v.as_str() == Some(expected)),
        _ => false,
    }
}

fn now() -> i64 {
    Utc::now().timestamp()
}
