//! Error types for trust root handling and bundle signing.
//!
//! Note that signature *verification* never returns these: the contract
//! fails closed to `false` so a caller cannot mistake a fault for success.

use provchain_core::CanonicalizationError;
use thiserror::Error;

/// Errors raised while loading trust roots or signing a bundle.
#[derive(Debug, Error)]
pub enum TrustError {
    #[error("invalid base64url encoding: {0}")]
    InvalidEncoding(String),

    #[error("Ed25519 key must be 32 bytes, got {0}")]
    InvalidKeyLength(usize),

    #[error("invalid public key")]
    InvalidPublicKey,

    #[error("invalid signature")]
    InvalidSignature,

    #[error("JWKS document has no keys array")]
    MalformedJwks,

    #[error("signing message unavailable: bundle lacks a trace id or timestamp")]
    MessageUnavailable,

    #[error("canonicalization failed: {0}")]
    Canonicalization(#[from] CanonicalizationError),
}

/// Result type for trust operations.
pub type Result<T> = std::result::Result<T, TrustError>;
