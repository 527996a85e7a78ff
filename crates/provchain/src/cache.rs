//! Content-addressed verdict memoization.
//!
//! Keyed by the bundle's own computed CID, so identical content maps to one
//! entry regardless of which trace it arrived under. Read-through: a miss
//! (or a poisoned lock) recomputes; concurrent duplicate requests may
//! recompute redundantly, which is always safe since verification is pure.

use std::collections::HashMap;
use std::sync::RwLock;

use provchain_core::Cid;
use provchain_trust::SignatureMetadata;

use crate::verifier::Verdict;

/// A memoized verdict plus the envelope it was computed under.
///
/// `cid_match` and `sig_ok` depend on the transport attestations, not just
/// the content, so a hit requires the envelope to match too.
#[derive(Debug, Clone)]
struct CachedVerdict {
    claimed_cid: Option<Cid>,
    signature: Option<SignatureMetadata>,
    verdict: Verdict,
}

/// Thread-safe verdict cache.
pub struct VerdictCache {
    entries: RwLock<HashMap<Cid, CachedVerdict>>,
}

impl VerdictCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Look up a verdict for a bundle CID under the given envelope.
    pub fn get(
        &self,
        bundle_cid: &Cid,
        claimed_cid: Option<&Cid>,
        signature: Option<&SignatureMetadata>,
    ) -> Option<Verdict> {
        let entries = self.entries.read().ok()?;
        let cached = entries.get(bundle_cid)?;
        let same_envelope = cached.claimed_cid.as_ref() == claimed_cid
            && cached.signature.as_ref() == signature;
        same_envelope.then(|| cached.verdict.clone())
    }

    /// Store a verdict, keyed by the CID it carries.
    pub fn insert(
        &self,
        claimed_cid: Option<&Cid>,
        signature: Option<&SignatureMetadata>,
        verdict: &Verdict,
    ) {
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(
                verdict.bundle_cid.clone(),
                CachedVerdict {
                    claimed_cid: claimed_cid.cloned(),
                    signature: signature.cloned(),
                    verdict: verdict.clone(),
                },
            );
        }
    }

    /// Number of cached verdicts.
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for VerdictCache {
    fn default() -> Self {
        Self::new()
    }
}
