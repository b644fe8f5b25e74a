//! Domain layer containing token entities.

pub mod entities;

// Re-export commonly used domain types
pub use entities::{
    numeric_date, ClaimSet, DecodedToken, TokenHeader,
    CLAIM_AUD, CLAIM_EXP, CLAIM_IAT, CLAIM_ISS, CLAIM_NBF, TOKEN_TYPE,
};
