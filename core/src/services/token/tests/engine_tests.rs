//! Unit tests for the token engine

use na_shared::JwtConfig;
use serde_json::json;

use crate::domain::entities::token::ClaimSet;
use crate::errors::{DomainError, TokenError};
use crate::services::token::{encode_segment, SigningMethod};

use super::fixtures::{engine_for, engine_with, NOW};

fn claim_set(value: serde_json::Value) -> ClaimSet {
    serde_json::from_value(value).unwrap()
}

fn token_error(err: DomainError) -> TokenError {
    match err {
        DomainError::Token(err) => err,
        other => panic!("expected a token error, got {:?}", other),
    }
}

#[test]
fn test_sign_and_verify_round_trip() {
    let config = JwtConfig::default()
        .with_algorithm("ES256")
        .with_issuer("nodeagent")
        .with_audience("cluster");
    let engine = engine_with(config, "es256_private.pem", "es256_public.pem");

    let token = engine
        .sign_at(claim_set(json!({"sub": "node-1", "role": "agent"})), NOW)
        .unwrap();
    let decoded = engine.verify_at(&token, NOW).unwrap();

    assert_eq!(decoded.header.alg(), Some("ES256"));
    assert_eq!(decoded.header.typ(), Some("JWT"));
    assert_eq!(
        serde_json::Value::Object(decoded.claims),
        json!({
            "iat": NOW,
            "exp": NOW + 30 * 60,
            "iss": "nodeagent",
            "aud": "cluster",
            "sub": "node-1",
            "role": "agent",
        })
    );
}

#[test]
fn test_token_is_three_segments() {
    let engine = engine_for(SigningMethod::EdDsa);
    let token = engine.sign_at(ClaimSet::new(), NOW).unwrap();
    assert_eq!(token.split('.').count(), 3);

    let shown = engine.show(&token).unwrap();
    assert_eq!(shown.header.alg(), Some("EdDSA"));
    assert_eq!(shown.claims["iat"], json!(NOW));
}

#[test]
fn test_expired_token() {
    let engine = engine_for(SigningMethod::Es512);
    let token = engine
        .sign_at(claim_set(json!({"exp": NOW - 1})), NOW)
        .unwrap();

    let err = token_error(engine.verify_at(&token, NOW).unwrap_err());
    assert_eq!(err, TokenError::TokenExpired);
}

#[test]
fn test_expiry_boundary() {
    let engine = engine_for(SigningMethod::EdDsa);
    let token = engine.sign_at(claim_set(json!({"exp": NOW})), NOW).unwrap();

    assert!(engine.verify_at(&token, NOW).is_ok());
    assert!(engine.verify_at(&token, NOW + 1).is_err());
}

#[test]
fn test_negative_expiry_minutes_yield_expired_tokens() {
    let config = JwtConfig::default()
        .with_algorithm("EdDSA")
        .with_expiry_minutes(-1);
    let engine = engine_with(config, "ed25519_private.pem", "ed25519_public.pem");

    let token = engine.sign_at(ClaimSet::new(), NOW).unwrap();
    let err = token_error(engine.verify_at(&token, NOW).unwrap_err());
    assert_eq!(err, TokenError::TokenExpired);
}

#[test]
fn test_leeway_applies_to_expiry() {
    let config = JwtConfig::default().with_algorithm("EdDSA").with_leeway(10);
    let engine = engine_with(config, "ed25519_private.pem", "ed25519_public.pem");

    let token = engine.sign_at(claim_set(json!({"exp": NOW - 5})), NOW).unwrap();
    assert!(engine.verify_at(&token, NOW).is_ok());
    assert!(engine.verify_at(&token, NOW + 6).is_err());
}

#[test]
fn test_not_yet_valid() {
    let engine = engine_for(SigningMethod::EdDsa);

    let token = engine.sign_at(claim_set(json!({"nbf": NOW + 60})), NOW).unwrap();
    let err = token_error(engine.verify_at(&token, NOW).unwrap_err());
    assert_eq!(err, TokenError::TokenNotYetValid);
    assert!(engine.verify_at(&token, NOW + 60).is_ok());

    // Issued in the future
    let token = engine.sign_at(ClaimSet::new(), NOW + 60).unwrap();
    let err = token_error(engine.verify_at(&token, NOW).unwrap_err());
    assert_eq!(err, TokenError::TokenNotYetValid);
}

#[test]
fn test_non_numeric_expiry() {
    let engine = engine_for(SigningMethod::EdDsa);
    let token = engine.sign_at(claim_set(json!({"exp": "soon"})), NOW).unwrap();

    let err = token_error(engine.verify_at(&token, NOW).unwrap_err());
    assert!(matches!(err, TokenError::InvalidClaims { .. }));
}

#[test]
fn test_missing_expiry_is_accepted() {
    // sign() always sets exp, so build the token by hand
    let engine = engine_for(SigningMethod::EdDsa);
    let method = SigningMethod::EdDsa;
    let key = method.signing_key(engine.keys().private_pem()).unwrap();

    let input = format!(
        "{}.{}",
        encode_segment(&json!({"typ": "JWT", "alg": "EdDSA"})).unwrap(),
        encode_segment(&json!({"sub": "node-1"})).unwrap()
    );
    let token = format!("{}.{}", input, method.sign(input.as_bytes(), &key).unwrap());

    let decoded = engine.verify_at(&token, NOW).unwrap();
    assert!(decoded.expires_at().is_none());
    assert_eq!(decoded.claims["sub"], json!("node-1"));
}

#[test]
fn test_tampered_payload() {
    let engine = engine_for(SigningMethod::Rs256);
    let token = engine.sign_at(claim_set(json!({"role": "agent"})), NOW).unwrap();
    let parts: Vec<&str> = token.split('.').collect();

    let tampered_claims = encode_segment(&json!({
        "role": "admin",
        "iat": NOW,
        "exp": NOW + 1800,
    }))
    .unwrap();
    let tampered = format!("{}.{}.{}", parts[0], tampered_claims, parts[2]);

    let err = token_error(engine.verify_at(&tampered, NOW).unwrap_err());
    assert_eq!(err, TokenError::InvalidSignature);
}

#[test]
fn test_bit_flip_in_payload_text() {
    let engine = engine_for(SigningMethod::Es384);
    let token = engine.sign_at(claim_set(json!({"sub": "node-1"})), NOW).unwrap();
    let header_len = token.find('.').unwrap();

    let mut bytes = token.into_bytes();
    bytes[header_len + 3] ^= 0x01;
    let flipped = String::from_utf8(bytes).unwrap();

    let err = token_error(engine.verify_at(&flipped, NOW).unwrap_err());
    assert_eq!(err, TokenError::InvalidSignature);
}

#[test]
fn test_show_does_not_authenticate() {
    let engine = engine_for(SigningMethod::Es512);
    let token = engine.sign_at(claim_set(json!({"sub": "node-1"})), NOW).unwrap();
    let unsigned = format!("{}.AAAA", &token[..token.rfind('.').unwrap()]);

    let shown = engine.show(&unsigned).unwrap();
    assert_eq!(shown.header.alg(), Some("ES512"));
    assert_eq!(shown.claims["sub"], json!("node-1"));
    assert_eq!(shown.signature, "AAAA");

    let err = token_error(engine.verify_at(&unsigned, NOW).unwrap_err());
    assert_eq!(err, TokenError::InvalidSignature);
}

#[test]
fn test_show_ignores_expiry() {
    let engine = engine_for(SigningMethod::EdDsa);
    let token = engine.sign_at(claim_set(json!({"exp": 1})), NOW).unwrap();
    assert_eq!(engine.show(&token).unwrap().expires_at(), Some(1));
}

#[test]
fn test_show_accepts_any_json_object_header() {
    let engine = engine_for(SigningMethod::Es256);
    let payload = encode_segment(&json!({"sub": "x"})).unwrap();

    let header = encode_segment(&json!({"typ": "JWT"})).unwrap();
    let shown = engine.show(&format!("{}.{}.garbage", header, payload)).unwrap();
    assert!(shown.header.alg().is_none());
    assert_eq!(shown.header.typ(), Some("JWT"));
    assert_eq!(shown.claims["sub"], json!("x"));

    let header = encode_segment(&json!({"alg": "ES256", "kid": 42})).unwrap();
    let shown = engine.show(&format!("{}.{}.garbage", header, payload)).unwrap();
    assert_eq!(shown.header.alg(), Some("ES256"));
    assert!(shown.header.kid().is_none());
    assert_eq!(shown.header.get("kid"), Some(&json!(42)));
}

#[test]
fn test_verify_requires_string_alg() {
    let engine = engine_for(SigningMethod::Es256);
    let payload = encode_segment(&json!({"sub": "x"})).unwrap();

    for header in [json!({"typ": "JWT"}), json!({"alg": 256})] {
        let token = format!("{}.{}.c2ln", encode_segment(&header).unwrap(), payload);
        let err = engine.verify_at(&token, NOW).unwrap_err();
        assert!(err.is_format_error(), "{}: {:?}", header, err);
    }
}

#[test]
fn test_padded_segments_are_accepted() {
    let engine = engine_for(SigningMethod::EdDsa);

    // {"sub":"x"} with base64 padding
    let header = encode_segment(&json!({"alg": "EdDSA"})).unwrap();
    let shown = engine.show(&format!("{}.eyJzdWIiOiJ4In0=.sig", header)).unwrap();
    assert_eq!(shown.claims["sub"], json!("x"));

    // Signed over the padded text, still verifies
    let method = SigningMethod::EdDsa;
    let key = method.signing_key(engine.keys().private_pem()).unwrap();
    let input = format!("{}.eyJzdWIiOiJ4In0=", header);
    let token = format!("{}.{}", input, method.sign(input.as_bytes(), &key).unwrap());
    assert_eq!(engine.verify_at(&token, NOW).unwrap().claims["sub"], json!("x"));
}

#[test]
fn test_malformed_tokens() {
    let engine = engine_for(SigningMethod::Es256);
    for token in ["not.a.validtoken.extra", "onlyonepart", "", "a.b"] {
        let err = engine.verify(token).unwrap_err();
        assert!(err.is_format_error(), "{:?}: {:?}", token, err);
        assert!(engine.show(token).unwrap_err().is_format_error());
    }
}

#[test]
fn test_undecodable_header() {
    let engine = engine_for(SigningMethod::Es256);
    let err = engine.verify("%%%.e30.sig").unwrap_err();
    assert!(err.is_format_error());
}

#[test]
fn test_unsupported_algorithm() {
    let config = JwtConfig::default().with_algorithm("HS9999");
    let engine = engine_with(config, "es256_private.pem", "es256_public.pem");
    assert!(!engine.algorithm().is_supported());

    let err = token_error(engine.sign(ClaimSet::new()).unwrap_err());
    assert_eq!(
        err,
        TokenError::UnsupportedAlgorithm {
            algorithm: "HS9999".to_string()
        }
    );

    let header = encode_segment(&json!({"alg": "HS9999"})).unwrap();
    let token = format!("{}.e30.c2ln", header);
    let err = token_error(engine.verify(&token).unwrap_err());
    assert!(matches!(err, TokenError::UnsupportedAlgorithm { .. }));
}

#[test]
fn test_algorithm_confusion_is_rejected() {
    let es256 = engine_for(SigningMethod::Es256);
    let es384 = engine_with(
        JwtConfig::default().with_algorithm("ES384"),
        "es256_private.pem",
        "es256_public.pem",
    );

    let token = es256.sign_at(ClaimSet::new(), NOW).unwrap();
    let err = token_error(es384.verify_at(&token, NOW).unwrap_err());
    assert_eq!(
        err,
        TokenError::AlgorithmMismatch {
            expected: "ES384".to_string(),
            found: "ES256".to_string(),
        }
    );

    // Unsigned token declaring "none"
    let header = encode_segment(&json!({"alg": "none"})).unwrap();
    let payload = encode_segment(&json!({"sub": "root"})).unwrap();
    let token = format!("{}.{}.", header, payload);
    let err = token_error(es256.verify_at(&token, NOW).unwrap_err());
    assert!(matches!(err, TokenError::AlgorithmMismatch { .. }));
}

#[test]
fn test_wrong_key_pair_same_family() {
    let signer = engine_for(SigningMethod::Es256);
    let verifier = engine_with(
        JwtConfig::default().with_algorithm("ES256"),
        "es256_other_private.pem",
        "es256_other_public.pem",
    );

    let token = signer.sign_at(ClaimSet::new(), NOW).unwrap();
    let err = token_error(verifier.verify_at(&token, NOW).unwrap_err());
    assert_eq!(err, TokenError::InvalidSignature);
}

#[test]
fn test_wrong_family_public_key() {
    let signer = engine_for(SigningMethod::Rs256);
    let verifier = engine_with(
        JwtConfig::default().with_algorithm("RS256"),
        "rsa_private.pem",
        "es256_public.pem",
    );

    let token = signer.sign_at(ClaimSet::new(), NOW).unwrap();
    let err = token_error(verifier.verify_at(&token, NOW).unwrap_err());
    assert!(matches!(err, TokenError::InvalidKey { family: "RSA", .. }));
}

#[test]
fn test_invalid_private_key() {
    let engine = engine_with(
        JwtConfig::default().with_algorithm("EdDSA"),
        "rsa_private.pem",
        "ed25519_public.pem",
    );
    let err = token_error(engine.sign(ClaimSet::new()).unwrap_err());
    assert!(matches!(err, TokenError::InvalidKey { family: "EdDSA", .. }));
}

#[test]
fn test_curve_mismatch_fails_to_sign() {
    // P-256 key configured for ES384
    let engine = engine_with(
        JwtConfig::default().with_algorithm("ES384"),
        "es256_private.pem",
        "es256_public.pem",
    );
    let err = engine.sign(ClaimSet::new()).unwrap_err();
    assert!(err.is_crypto_error(), "{:?}", err);
}

#[test]
fn test_issuer_enforcement_is_opt_in() {
    let signer = engine_with(
        JwtConfig::default().with_algorithm("EdDSA").with_issuer("someone-else"),
        "ed25519_private.pem",
        "ed25519_public.pem",
    );
    let token = signer.sign_at(ClaimSet::new(), NOW).unwrap();

    let lenient = engine_with(
        JwtConfig::default().with_algorithm("EdDSA").with_issuer("nodeagent"),
        "ed25519_private.pem",
        "ed25519_public.pem",
    );
    assert!(lenient.verify_at(&token, NOW).is_ok());

    let strict = engine_with(
        lenient.config().clone().require_issuer(),
        "ed25519_private.pem",
        "ed25519_public.pem",
    );
    let err = token_error(strict.verify_at(&token, NOW).unwrap_err());
    assert_eq!(err, TokenError::InvalidIssuer);

    let own = strict.sign_at(ClaimSet::new(), NOW).unwrap();
    assert!(strict.verify_at(&own, NOW).is_ok());
}

#[test]
fn test_audience_enforcement() {
    let config = JwtConfig::default()
        .with_algorithm("EdDSA")
        .with_audience("cluster")
        .require_audience();
    let engine = engine_with(config, "ed25519_private.pem", "ed25519_public.pem");

    let token = engine.sign_at(ClaimSet::new(), NOW).unwrap();
    assert!(engine.verify_at(&token, NOW).is_ok());

    let token = engine
        .sign_at(claim_set(json!({"aud": ["billing", "cluster"]})), NOW)
        .unwrap();
    assert!(engine.verify_at(&token, NOW).is_ok());

    let token = engine.sign_at(claim_set(json!({"aud": "billing"})), NOW).unwrap();
    let err = token_error(engine.verify_at(&token, NOW).unwrap_err());
    assert_eq!(err, TokenError::InvalidAudience);

    let token = engine.sign_at(claim_set(json!({"aud": null})), NOW).unwrap();
    assert!(engine.verify_at(&token, NOW).is_err());
}
