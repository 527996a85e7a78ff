//! Bundle retrieval boundary.
//!
//! The transport that actually talks to a gateway lives outside this crate;
//! the service only needs something that yields a [`FetchedBundle`] for a
//! trace identifier. Retry and backoff policy belong to the transport, not
//! here.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use provchain_core::{Bundle, BundleError, Cid};
use provchain_trust::SignatureMetadata;

use crate::error::FetchError;

/// A bundle plus the transport-level attestations that came with it.
///
/// The claimed CID and signature ride out-of-band, as gateway response
/// headers; they are inputs to verification, not part of the canonicalized
/// body.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedBundle {
    pub bundle: Bundle,
    pub claimed_cid: Option<Cid>,
    pub signature: Option<SignatureMetadata>,
}

impl FetchedBundle {
    /// A bundle with no transport attestations.
    pub fn unsigned(bundle: Bundle) -> Self {
        Self {
            bundle,
            claimed_cid: None,
            signature: None,
        }
    }

    /// Parse a raw JSON body into an unsigned fetched bundle.
    pub fn from_value(value: Value) -> Result<Self, BundleError> {
        Ok(Self::unsigned(Bundle::from_value(value)?))
    }

    /// Attach the CID the remote claimed for this bundle.
    pub fn with_claimed_cid(mut self, cid: Cid) -> Self {
        self.claimed_cid = Some(cid);
        self
    }

    /// Attach detached signature metadata.
    pub fn with_signature(mut self, metadata: SignatureMetadata) -> Self {
        self.signature = Some(metadata);
        self
    }
}

/// The async boundary a bundle provider must satisfy.
#[async_trait]
pub trait BundleSource: Send + Sync {
    /// Fetch the exported bundle for a trace identifier.
    async fn fetch(&self, trace_id: &str) -> Result<FetchedBundle, FetchError>;
}

#[async_trait]
impl<S: BundleSource + ?Sized> BundleSource for Arc<S> {
    async fn fetch(&self, trace_id: &str) -> Result<FetchedBundle, FetchError> {
        (**self).fetch(trace_id).await
    }
}

/// In-memory source keyed by trace id.
///
/// Serves tests and embedded use; has the same contract as a gateway-backed
/// source but no transport.
pub struct MemorySource {
    bundles: RwLock<HashMap<String, FetchedBundle>>,
}

impl MemorySource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self {
            bundles: RwLock::new(HashMap::new()),
        }
    }

    /// Register a bundle under a trace id.
    pub async fn insert(&self, trace_id: impl Into<String>, fetched: FetchedBundle) {
        self.bundles.write().await.insert(trace_id.into(), fetched);
    }
}

impl Default for MemorySource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BundleSource for MemorySource {
    async fn fetch(&self, trace_id: &str) -> Result<FetchedBundle, FetchError> {
        self.bundles
            .read()
            .await
            .get(trace_id)
            .cloned()
            .ok_or_else(|| FetchError::NotFound(trace_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_memory_source_roundtrip() {
        let source = MemorySource::new();
        let fetched = FetchedBundle::from_value(json!({
            "trace_id": "t1",
            "chain": [{"receipt_hash": "a"}]
        }))
        .unwrap();

        source.insert("t1", fetched.clone()).await;
        assert_eq!(source.fetch("t1").await.unwrap(), fetched);
    }

    #[tokio::test]
    async fn test_memory_source_missing_trace() {
        let source = MemorySource::new();
        let err = source.fetch("nope").await.unwrap_err();
        assert!(matches!(err, FetchError::NotFound(trace) if trace == "nope"));
    }

    #[test]
    fn test_fetched_bundle_builders() {
        let bundle = Bundle::from_value(json!({"chain": []})).unwrap();
        let cid = Cid::address(b"x");
        let metadata = SignatureMetadata::new("sig", None);

        let fetched = FetchedBundle::unsigned(bundle)
            .with_claimed_cid(cid.clone())
            .with_signature(metadata.clone());

        assert_eq!(fetched.claimed_cid, Some(cid));
        assert_eq!(fetched.signature, Some(metadata));
    }

    #[test]
    fn test_from_value_rejects_non_array_chain() {
        assert!(FetchedBundle::from_value(json!({"chain": 5})).is_err());
    }
}
