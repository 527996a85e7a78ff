//! # Provchain
//!
//! Provenance chain integrity verification: checks that a sequence of
//! receipts exported by a provenance-emitting pipeline forms a
//! tamper-evident, continuous chain, and projects it into a graph for
//! inspection.
//!
//! ## Overview
//!
//! A verification request flows through four independent steps:
//!
//! - **Canonicalize** the fetched bundle into deterministic JSON bytes
//! - **Address** those bytes as a `sha256:` content identifier
//! - **Check** chain continuity, CID agreement, and the bundle signature
//! - **Project** the chain into node/edge sets for a renderer
//!
//! The three checks are independent and never short-circuit; the verdict
//! always carries all three booleans plus their conjunction.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use provchain::{
//!     FetchedBundle, MemorySource, ServiceConfig, VerificationService, Verifier,
//! };
//! use provchain::trust::TrustedKeys;
//!
//! async fn example() {
//!     let source = MemorySource::new();
//!     let bundle = FetchedBundle::from_value(serde_json::json!({
//!         "trace_id": "demo-trace-001",
//!         "chain": []
//!     }))
//!     .unwrap();
//!     source.insert("demo-trace-001", bundle).await;
//!
//!     let verifier = Verifier::new(TrustedKeys::empty());
//!     let service = VerificationService::new(source, verifier);
//!
//!     let verdict = service.verify("demo-trace-001").await.unwrap();
//!     println!("chain_ok={} cid={}", verdict.chain_ok, verdict.bundle_cid);
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `provchain::core` - pure primitives (bundles, canonical bytes, CIDs)
//! - `provchain::trust` - the signature verification contract

pub mod cache;
pub mod error;
pub mod passport;
pub mod policy;
pub mod service;
pub mod source;
pub mod verifier;

// Re-export component crates
pub use provchain_core as core;
pub use provchain_trust as trust;

pub use cache::VerdictCache;
pub use error::{FetchError, Result, ServiceError};
pub use passport::{build_passport, Passport, PolicyBreach};
pub use policy::{summarize_policy, PolicySummary};
pub use service::{GraphExport, ServiceConfig, VerificationService};
pub use source::{BundleSource, FetchedBundle, MemorySource};
pub use verifier::{ChainDiagnostics, Verdict, Verifier};

// Re-export commonly used core and trust types
pub use provchain_core::{Bundle, Cid, GraphProjection, Receipt, ReceiptHash};
pub use provchain_trust::{
    Ed25519SignatureVerifier, Keypair, SignatureMetadata, SignatureScheme, SignatureVerifier,
    TrustedKey, TrustedKeys,
};
