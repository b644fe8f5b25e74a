//! Domain entities representing tokens and their parts.

pub mod token;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use token::{
    numeric_date, ClaimSet, DecodedToken, TokenHeader,
    CLAIM_AUD, CLAIM_EXP, CLAIM_IAT, CLAIM_ISS, CLAIM_NBF, TOKEN_TYPE,
};
