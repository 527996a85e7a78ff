//! The signature verification contract and its Ed25519 implementation.
//!
//! Verification is fail-closed: absent, malformed, or untrusted material
//! yields `false`, never an error a caller could mistake for success. The
//! signed message embeds the bundle's own CID, which binds a signature to
//! one bundle and rejects replay across bundles.

use provchain_core::{cid_of_value, Bundle, Cid};

use crate::error::{Result, TrustError};
use crate::keys::{Ed25519Signature, Keypair, TrustedKeys};
use crate::metadata::SignatureMetadata;

/// The message layouts a signer may have used.
///
/// Both are derived from the locally recomputed CID, so signer and verifier
/// must share the canonical byte form exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureScheme {
    /// `"{cid}|{trace_id}|{ts}"` - binds trace identity and export time.
    CidTraceTs,
    /// The CID string alone.
    Cid,
}

impl SignatureScheme {
    /// Verification order: the richer binding is tried first.
    pub const ALL: [SignatureScheme; 2] = [SignatureScheme::CidTraceTs, SignatureScheme::Cid];
}

/// Build the message a signature covers, shared by sign and verify sides.
///
/// Returns `None` when the bundle lacks the fields the scheme needs.
pub fn signing_message(scheme: SignatureScheme, cid: &Cid, bundle: &Bundle) -> Option<String> {
    match scheme {
        SignatureScheme::CidTraceTs => {
            let trace_id = bundle.trace_id()?;
            let ts = bundle.ts()?;
            Some(format!("{cid}|{trace_id}|{ts}"))
        }
        SignatureScheme::Cid => Some(cid.to_string()),
    }
}

/// The pluggable capability that authenticates a bundle against trust roots.
///
/// Implementations must fail closed and must bind signatures to the bundle
/// CID computed over the shared canonical form.
pub trait SignatureVerifier: Send + Sync {
    fn verify_signature(
        &self,
        bundle: &Bundle,
        metadata: &SignatureMetadata,
        trusted: &TrustedKeys,
    ) -> bool;
}

/// Ed25519 verification over the [`SignatureScheme`] message layouts.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ed25519SignatureVerifier;

impl SignatureVerifier for Ed25519SignatureVerifier {
    fn verify_signature(
        &self,
        bundle: &Bundle,
        metadata: &SignatureMetadata,
        trusted: &TrustedKeys,
    ) -> bool {
        let Some(entry) = trusted.lookup(metadata.kid.as_deref()) else {
            return false;
        };
        let Ok(signature) = Ed25519Signature::from_b64u(&metadata.signature) else {
            return false;
        };
        let Ok(cid) = cid_of_value(bundle.raw()) else {
            return false;
        };

        SignatureScheme::ALL.iter().any(|scheme| {
            signing_message(*scheme, &cid, bundle)
                .map(|message| entry.key.verify(message.as_bytes(), &signature).is_ok())
                .unwrap_or(false)
        })
    }
}

impl Keypair {
    /// Sign a bundle under the given scheme, producing wire metadata.
    ///
    /// Uses the same message builder the verifier uses; a scheme whose
    /// fields the bundle lacks is an error rather than a silent fallback.
    pub fn sign_bundle(
        &self,
        bundle: &Bundle,
        scheme: SignatureScheme,
        kid: Option<&str>,
    ) -> Result<SignatureMetadata> {
        let cid = cid_of_value(bundle.raw())?;
        let message = signing_message(scheme, &cid, bundle).ok_or(TrustError::MessageUnavailable)?;
        let signature = self.sign(message.as_bytes());
        Ok(SignatureMetadata::new(
            signature.to_b64u(),
            kid.map(str::to_owned),
        ))
    }
}
