//! # Provchain Trust
//!
//! The signature verification contract for provenance bundles.
//!
//! The verifier core never implements cryptography itself; it composes with
//! the [`SignatureVerifier`] trait defined here. This crate supplies:
//!
//! - [`TrustedKeys`] - explicit trust roots, loadable from a JWKS document
//! - [`SignatureMetadata`] - the detached signature carried by the transport
//! - [`Ed25519SignatureVerifier`] - the concrete fail-closed implementation
//! - [`Keypair`] - signing support for fixtures and emitting pipelines
//!
//! Signatures are bound to a bundle's content identifier: the signed message
//! is derived from the CID of the bundle's canonical bytes, so the signer
//! and the verifier must canonicalize identically.

pub mod error;
pub mod keys;
pub mod metadata;
pub mod verify;

pub use error::{Result, TrustError};
pub use keys::{Ed25519PublicKey, Ed25519Signature, Keypair, TrustedKey, TrustedKeys};
pub use metadata::SignatureMetadata;
pub use verify::{signing_message, Ed25519SignatureVerifier, SignatureScheme, SignatureVerifier};
