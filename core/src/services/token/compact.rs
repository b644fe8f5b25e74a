//! Compact serialization: `base64url(header).base64url(payload).signature`

use base64::alphabet::URL_SAFE;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::domain::entities::token::{ClaimSet, DecodedToken, TokenHeader};
use crate::errors::TokenError;

/// base64url; encodes without padding, decodes with or without it
const SEGMENT_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// The three segments of a compact token, still encoded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompactParts<'a> {
    pub header: &'a str,
    pub payload: &'a str,
    pub signature: &'a str,
}

impl<'a> CompactParts<'a> {
    /// `header.payload`, the bytes covered by the signature
    pub fn signing_input(&self) -> String {
        signing_input(self.header, self.payload)
    }

    pub fn decode_header(&self) -> Result<TokenHeader, TokenError> {
        decode_segment(self.header, "header")
    }

    pub fn decode_claims(&self) -> Result<ClaimSet, TokenError> {
        decode_segment(self.payload, "payload")
    }

    /// Decodes header and claims; the signature is left untouched
    pub fn decode(&self) -> Result<DecodedToken, TokenError> {
        Ok(DecodedToken {
            header: self.decode_header()?,
            claims: self.decode_claims()?,
            signature: self.signature.to_string(),
        })
    }
}

/// Splits a compact token into exactly three segments
///
/// Surrounding whitespace (a trailing newline from a file or pipe) is ignored.
pub fn split_compact(token: &str) -> Result<CompactParts<'_>, TokenError> {
    let segments: Vec<&str> = token.trim().split('.').collect();
    let &[header, payload, signature] = segments.as_slice() else {
        return Err(TokenError::format(format!(
            "expected 3 segments, found {}",
            segments.len()
        )));
    };
    if header.is_empty() || payload.is_empty() {
        return Err(TokenError::format("empty header or payload segment"));
    }
    Ok(CompactParts {
        header,
        payload,
        signature,
    })
}

pub fn signing_input(header: &str, payload: &str) -> String {
    let mut input = String::with_capacity(header.len() + 1 + payload.len());
    input.push_str(header);
    input.push('.');
    input.push_str(payload);
    input
}

/// JSON-serializes `value` and base64url-encodes it without padding
pub fn encode_segment<T: Serialize>(value: &T) -> Result<String, TokenError> {
    let json = serde_json::to_vec(value).map_err(|e| TokenError::TokenGenerationFailed {
        message: format!("failed to serialize segment: {}", e),
    })?;
    Ok(SEGMENT_ENGINE.encode(json))
}

/// Base64url-decodes a segment (padded or not) and parses its JSON
pub fn decode_segment<T: DeserializeOwned>(segment: &str, what: &str) -> Result<T, TokenError> {
    let bytes = SEGMENT_ENGINE
        .decode(segment)
        .map_err(|e| TokenError::format(format!("{} is not base64url: {}", what, e)))?;
    serde_json::from_slice(&bytes)
        .map_err(|e| TokenError::format(format!("{} is not valid JSON: {}", what, e)))
}
