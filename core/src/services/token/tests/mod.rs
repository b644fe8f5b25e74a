//! Tests for the token engine

#[cfg(test)]
mod engine_tests;
