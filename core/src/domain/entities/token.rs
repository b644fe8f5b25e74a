//! Token entities for JWT signing and inspection.
//!
//! Tokens are never stored: a token exists as a compact string on the wire and
//! as a [`DecodedToken`] for the duration of one verify or show call.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Expiration time claim (Unix seconds)
pub const CLAIM_EXP: &str = "exp";

/// Issued-at claim (Unix seconds)
pub const CLAIM_IAT: &str = "iat";

/// Not-before claim (Unix seconds)
pub const CLAIM_NBF: &str = "nbf";

/// Issuer claim
pub const CLAIM_ISS: &str = "iss";

/// Audience claim
pub const CLAIM_AUD: &str = "aud";

/// Token type written into every header this engine produces
pub const TOKEN_TYPE: &str = "JWT";

/// Claim name to JSON value mapping carried in the token payload
pub type ClaimSet = Map<String, Value>;

// JOSE header parameter names
pub const HEADER_ALG: &str = "alg";
pub const HEADER_TYP: &str = "typ";
pub const HEADER_KID: &str = "kid";

/// JOSE header of a compact token
///
/// Any JSON object is a header; the typed accessors return `None` when a
/// parameter is missing or not a string. Only verification requires `alg`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenHeader {
    params: Map<String, Value>,
}

impl TokenHeader {
    /// Header for a freshly signed token
    pub fn new(alg: impl Into<String>) -> Self {
        let mut params = Map::new();
        params.insert(HEADER_TYP.to_string(), Value::from(TOKEN_TYPE));
        params.insert(HEADER_ALG.to_string(), Value::from(alg.into()));
        Self { params }
    }

    /// Algorithm identifier as declared by the token
    pub fn alg(&self) -> Option<&str> {
        self.string_param(HEADER_ALG)
    }

    pub fn typ(&self) -> Option<&str> {
        self.string_param(HEADER_TYP)
    }

    /// Key ID hint
    pub fn kid(&self) -> Option<&str> {
        self.string_param(HEADER_KID)
    }

    /// Any header parameter, as decoded
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.params.get(name)
    }

    pub fn params(&self) -> &Map<String, Value> {
        &self.params
    }

    fn string_param(&self, name: &str) -> Option<&str> {
        self.params.get(name).and_then(Value::as_str)
    }
}

impl From<Map<String, Value>> for TokenHeader {
    fn from(params: Map<String, Value>) -> Self {
        Self { params }
    }
}

/// A token split into its decoded header and claims
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedToken {
    pub header: TokenHeader,
    pub claims: ClaimSet,
    /// Signature segment, still base64url encoded
    pub signature: String,
}

impl DecodedToken {
    /// Returns a claim by name
    pub fn claim(&self, name: &str) -> Option<&Value> {
        self.claims.get(name)
    }

    /// `exp` as Unix seconds, if present and numeric
    pub fn expires_at(&self) -> Option<i64> {
        self.numeric_claim(CLAIM_EXP)
    }

    /// `iat` as Unix seconds, if present and numeric
    pub fn issued_at(&self) -> Option<i64> {
        self.numeric_claim(CLAIM_IAT)
    }

    /// `iss`, if present and a string
    pub fn issuer(&self) -> Option<&str> {
        self.claims.get(CLAIM_ISS).and_then(Value::as_str)
    }

    fn numeric_claim(&self, name: &str) -> Option<i64> {
        self.claims.get(name).and_then(numeric_date)
    }
}

/// Interprets a JSON value as a NumericDate (seconds, fractions truncated)
pub fn numeric_date(value: &Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_u64().map(|v| i64::try_from(v).unwrap_or(i64::MAX)))
        .or_else(|| value.as_f64().map(|v| v as i64))
}
