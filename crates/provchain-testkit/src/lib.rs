//! # Provchain Testkit
//!
//! Testing utilities for the provenance verifier.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Fixtures**: deterministic receipt chains, signed and unsigned
//! - **Generators**: proptest strategies for bundles and JSON payloads
//! - **Golden vectors**: pinned canonical-byte outputs for cross-checking
//!   any signer against the verifier's byte form
//!
//! ## Fixtures
//!
//! ```rust
//! use provchain_testkit::fixtures::BundleFixture;
//!
//! let fixture = BundleFixture::new();
//! let bundle = fixture.bundle("demo-trace-001", &["ingest.v1", "train.v1"]);
//! assert_eq!(bundle.receipts().len(), 2);
//! ```
//!
//! ## Golden Vectors
//!
//! ```rust
//! use provchain_testkit::vectors::verify_all_vectors;
//!
//! verify_all_vectors().unwrap();
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{continuous_chain_value, BundleFixture};
pub use generators::{bundle_from_params, ChainParams};
pub use vectors::{all_vectors, verify_all_vectors, GoldenVector};
