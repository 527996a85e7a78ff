//! Error types for the verification service.

use provchain_core::{BundleError, CanonicalizationError};
use thiserror::Error;

/// Transport-level failure retrieving a bundle.
///
/// Kept distinct from verification failure: a gateway error is not the same
/// as "chain is broken", and consumers must be able to tell them apart.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("no bundle for trace {0}")]
    NotFound(String),

    #[error("gateway returned status {0}")]
    GatewayStatus(u16),

    #[error("bundle body is not valid JSON: {0}")]
    MalformedBody(String),

    #[error("malformed bundle: {0}")]
    MalformedBundle(#[from] BundleError),

    #[error("transport failure: {0}")]
    Transport(String),
}

/// Errors that can occur during a verification request.
///
/// Semantic failures (broken chain, bad signature, CID mismatch) are never
/// errors; they ride as data in the always-complete verdict.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("canonicalization failed: {0}")]
    Canonicalization(#[from] CanonicalizationError),
}

/// Result type for service operations.
pub type Result<T> = std::result::Result<T, ServiceError>;
