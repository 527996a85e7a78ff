//! The verification orchestrator: one bundle in, one complete verdict out.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use provchain_core::{
    canonical_bytes, check_continuity, continuity_break, duplicate_hashes, Bundle,
    CanonicalizationError, Cid, ReceiptHash,
};
use provchain_trust::{
    Ed25519SignatureVerifier, SignatureMetadata, SignatureVerifier, TrustedKeys,
};

/// The combined result of verifying one bundle.
///
/// This exact shape is the contract handed to any consumer. The three check
/// booleans are always all present; `ok` is their conjunction for consumers
/// that need a single pass/fail signal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub ok: bool,
    pub chain_ok: bool,
    pub cid_match: bool,
    pub sig_ok: bool,
    pub bundle_cid: Cid,
}

/// Optional chain diagnostics an operator may want beside the verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChainDiagnostics {
    /// Index of the first receipt whose back-reference fails.
    pub continuity_break: Option<usize>,

    /// Receipt hashes appearing more than once in the sequence.
    pub duplicate_hashes: Vec<ReceiptHash>,
}

/// Composes canonicalization, continuity, CID comparison, and the signature
/// contract into a single verdict.
///
/// Configuration (trust roots, signature implementation) is passed in at
/// construction so verification stays pure and testable.
pub struct Verifier {
    trusted: TrustedKeys,
    signature: Arc<dyn SignatureVerifier>,
}

impl Verifier {
    /// A verifier using Ed25519 signature verification.
    pub fn new(trusted: TrustedKeys) -> Self {
        Self::with_signature_verifier(trusted, Arc::new(Ed25519SignatureVerifier))
    }

    /// A verifier with a caller-supplied signature capability.
    pub fn with_signature_verifier(
        trusted: TrustedKeys,
        signature: Arc<dyn SignatureVerifier>,
    ) -> Self {
        Self { trusted, signature }
    }

    /// The trust roots this verifier accepts signatures from.
    pub fn trusted_keys(&self) -> &TrustedKeys {
        &self.trusted
    }

    /// Verify a bundle against an optional remote-claimed CID and optional
    /// signature metadata.
    ///
    /// All three checks run unconditionally; partial diagnostics like
    /// "signature bad but chain continuous" are operationally valuable, so
    /// nothing short-circuits. The only abort path is a canonicalization
    /// fault, which is a structural input error rather than a verification
    /// outcome.
    pub fn verify(
        &self,
        bundle: &Bundle,
        claimed_cid: Option<&Cid>,
        signature: Option<&SignatureMetadata>,
    ) -> Result<Verdict, CanonicalizationError> {
        let canonical = canonical_bytes(bundle.raw())?;
        let bundle_cid = Cid::address(&canonical);

        let chain_ok = check_continuity(bundle.receipts());

        // A match requires an authoritative remote claim; absence is not
        // agreement.
        let cid_match = claimed_cid.map_or(false, |claimed| *claimed == bundle_cid);

        let sig_ok = signature.map_or(false, |metadata| {
            self.signature
                .verify_signature(bundle, metadata, &self.trusted)
        });

        Ok(Verdict {
            ok: chain_ok && cid_match && sig_ok,
            chain_ok,
            cid_match,
            sig_ok,
            bundle_cid,
        })
    }

    /// Chain diagnostics for a bundle: where continuity broke and which
    /// hashes repeat. Total on malformed input.
    pub fn inspect(&self, bundle: &Bundle) -> ChainDiagnostics {
        ChainDiagnostics {
            continuity_break: continuity_break(bundle.receipts()),
            duplicate_hashes: duplicate_hashes(bundle.receipts()),
        }
    }
}
