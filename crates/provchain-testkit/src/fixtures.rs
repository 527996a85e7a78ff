//! Test fixtures: deterministic receipt chains and signed bundles.

use serde_json::{json, Value};

use provchain::FetchedBundle;
use provchain_core::{cid_of_value, Bundle, Cid};
use provchain_trust::{Keypair, SignatureScheme, TrustedKeys};

/// Build a continuous chain bundle value: one receipt per step label, each
/// receipt's hash derived from its own content and linked to its
/// predecessor.
pub fn continuous_chain_value(trace_id: &str, steps: &[&str]) -> Value {
    let mut chain = Vec::with_capacity(steps.len());
    let mut prev_hash: Option<String> = None;

    for (i, step) in steps.iter().enumerate() {
        let mut body = json!({
            "trace_id": trace_id,
            "ts": format!("2024-01-01T00:00:{:02}Z", i % 60),
            "normalized": {"step": step}
        });
        if let Some(prev) = &prev_hash {
            body["prev_receipt_hash"] = json!(prev);
        }
        let hash = cid_of_value(&body)
            .expect("fixture receipt bodies canonicalize")
            .to_string();
        body["receipt_hash"] = json!(hash);
        prev_hash = Some(hash);
        chain.push(body);
    }

    json!({"trace_id": trace_id, "chain": chain})
}

/// A fixture with a signing keypair and a matching trust set.
pub struct BundleFixture {
    pub keypair: Keypair,
    pub kid: String,
}

impl BundleFixture {
    /// Create with the default deterministic seed.
    pub fn new() -> Self {
        Self::with_seed([0x42; 32])
    }

    /// Create with a specific seed.
    pub fn with_seed(seed: [u8; 32]) -> Self {
        Self {
            keypair: Keypair::from_seed(&seed),
            kid: "fixture-signer".to_string(),
        }
    }

    /// A trust set containing exactly this fixture's key.
    pub fn trusted_keys(&self) -> TrustedKeys {
        TrustedKeys::single(self.kid.clone(), self.keypair.public_key())
    }

    /// A continuous bundle for the given steps.
    pub fn bundle(&self, trace_id: &str, steps: &[&str]) -> Bundle {
        Bundle::from_value(continuous_chain_value(trace_id, steps))
            .expect("fixture bundles parse")
    }

    /// A bundle whose second receipt references a bogus predecessor.
    pub fn broken_bundle(&self, trace_id: &str, steps: &[&str]) -> Bundle {
        let mut value = continuous_chain_value(trace_id, steps);
        value["chain"][1]["prev_receipt_hash"] = json!("sha256:not-the-predecessor");
        Bundle::from_value(value).expect("fixture bundles parse")
    }

    /// A fetched bundle with no transport attestations.
    pub fn fetched_unsigned(&self, trace_id: &str, steps: &[&str]) -> FetchedBundle {
        FetchedBundle::unsigned(self.bundle(trace_id, steps))
    }

    /// A fetched bundle carrying a correct remote-claimed CID.
    pub fn fetched_claimed(&self, trace_id: &str, steps: &[&str]) -> FetchedBundle {
        let bundle = self.bundle(trace_id, steps);
        let cid = cid_of_value(bundle.raw()).expect("fixture bundles canonicalize");
        FetchedBundle::unsigned(bundle).with_claimed_cid(cid)
    }

    /// A fetched bundle carrying both a correct claim and a valid signature.
    pub fn fetched_signed(
        &self,
        trace_id: &str,
        steps: &[&str],
        scheme: SignatureScheme,
    ) -> FetchedBundle {
        let bundle = self.bundle(trace_id, steps);
        let cid = cid_of_value(bundle.raw()).expect("fixture bundles canonicalize");
        let metadata = self
            .keypair
            .sign_bundle(&bundle, scheme, Some(self.kid.as_str()))
            .expect("fixture bundles sign");
        FetchedBundle::unsigned(bundle)
            .with_claimed_cid(cid)
            .with_signature(metadata)
    }

    /// The CID of a bundle this fixture would build for the given steps.
    pub fn expected_cid(&self, trace_id: &str, steps: &[&str]) -> Cid {
        cid_of_value(&continuous_chain_value(trace_id, steps))
            .expect("fixture bundles canonicalize")
    }
}

impl Default for BundleFixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use provchain::{MemorySource, VerificationService, Verifier};
    use provchain_core::check_continuity;

    #[test]
    fn test_fixture_chains_are_continuous() {
        let fixture = BundleFixture::new();
        let bundle = fixture.bundle("t1", &["ingest.v1", "train.v1", "eval.v1"]);
        assert_eq!(bundle.receipts().len(), 3);
        assert!(check_continuity(bundle.receipts()));
    }

    #[test]
    fn test_broken_fixture_breaks_continuity() {
        let fixture = BundleFixture::new();
        let bundle = fixture.broken_bundle("t1", &["ingest.v1", "train.v1"]);
        assert!(!check_continuity(bundle.receipts()));
    }

    #[test]
    fn test_fixture_deterministic() {
        let steps = ["ingest.v1", "train.v1"];
        assert_eq!(
            continuous_chain_value("t1", &steps),
            continuous_chain_value("t1", &steps)
        );
    }

    #[tokio::test]
    async fn test_signed_fixture_verifies() {
        let fixture = BundleFixture::new();
        let source = MemorySource::new();
        source
            .insert(
                "t1",
                fixture.fetched_signed("t1", &["ingest.v1", "train.v1"], SignatureScheme::CidTraceTs),
            )
            .await;

        let service =
            VerificationService::new(source, Verifier::new(fixture.trusted_keys()));
        let verdict = service.verify("t1").await.unwrap();
        assert!(verdict.ok);
        assert!(verdict.chain_ok);
        assert!(verdict.cid_match);
        assert!(verdict.sig_ok);
    }
}
