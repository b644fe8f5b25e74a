//! Default claim construction

use na_shared::JwtConfig;
use serde_json::Value;

use crate::domain::entities::token::{ClaimSet, CLAIM_AUD, CLAIM_EXP, CLAIM_IAT, CLAIM_ISS};

/// Builds the default claims for a token issued at `now` (Unix seconds)
///
/// `iat = now`, `exp = now + expiry`, plus `iss`/`aud` when configured.
pub fn default_claims(config: &JwtConfig, now: i64) -> ClaimSet {
    let mut claims = ClaimSet::new();
    claims.insert(
        CLAIM_EXP.to_string(),
        Value::from(now.saturating_add(config.default_expiry_seconds())),
    );
    claims.insert(CLAIM_IAT.to_string(), Value::from(now));
    if !config.audience.is_empty() {
        claims.insert(CLAIM_AUD.to_string(), Value::from(config.audience.as_str()));
    }
    if !config.issuer.is_empty() {
        claims.insert(CLAIM_ISS.to_string(), Value::from(config.issuer.as_str()));
    }
    claims
}

/// Applies caller claims over `defaults`; the caller wins on every key,
/// reserved ones (`exp`, `iat`, ...) included.
pub fn merge_claims(mut defaults: ClaimSet, overrides: ClaimSet) -> ClaimSet {
    defaults.extend(overrides);
    defaults
}
