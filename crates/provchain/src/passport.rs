//! Passport: the aggregate compliance summary of one trace.
//!
//! Computed beside the orchestrator, never inside it; a verdict does not
//! depend on any of this. Dataset chunk lists are folded into Merkle roots
//! so the passport can name data without carrying it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use provchain_core::{merkle_root, Bundle, Cid};

use crate::policy::{decision_outcome, is_breach, receipt_decisions};

/// One non-allow policy decision, reduced to what a reviewer scans for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyBreach {
    pub rule: Option<String>,
    pub outcome: Option<String>,
}

/// The aggregate summary handed to display surfaces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Passport {
    pub model_id: Option<String>,
    pub receipts: usize,
    pub steps: Vec<String>,
    pub dataset_roots: Vec<Cid>,
    pub policy_breaches: Vec<PolicyBreach>,
    pub safety_flags: BTreeMap<String, bool>,
    pub metrics: Map<String, Value>,
}

/// Aggregate a bundle's receipts into a passport.
///
/// Steps are kept in chain order and deduplicated; safety flags OR-merge
/// across receipts (a flag raised anywhere stays raised); metrics and the
/// model id are last-writer-wins in chain order.
pub fn build_passport(bundle: &Bundle) -> Passport {
    let mut passport = Passport {
        receipts: bundle.receipts().len(),
        ..Default::default()
    };

    for receipt in bundle.receipts() {
        if let Some(step) = receipt.step() {
            if !passport.steps.iter().any(|s| s == step) {
                passport.steps.push(step.to_owned());
            }
        }

        if let Some(model_id) = &receipt.normalized.model_id {
            passport.model_id = Some(model_id.clone());
        }

        for dataset in &receipt.normalized.datasets {
            let chunk_cids = dataset
                .chunks
                .iter()
                .filter_map(|chunk| chunk.cid.as_deref());
            passport.dataset_roots.push(merkle_root(chunk_cids));
        }

        for (flag, raised) in &receipt.normalized.safety {
            let entry = passport.safety_flags.entry(flag.clone()).or_insert(false);
            *entry = *entry || *raised;
        }

        for (key, value) in &receipt.normalized.metrics {
            passport.metrics.insert(key.clone(), value.clone());
        }

        for decision in receipt_decisions(receipt) {
            if is_breach(&decision) {
                passport.policy_breaches.push(PolicyBreach {
                    rule: breach_rule(&decision),
                    outcome: decision_outcome(&decision),
                });
            }
        }
    }

    passport
}

/// The rule name of a decision, under either of its field spellings.
fn breach_rule(decision: &Value) -> Option<String> {
    decision
        .get("rule")
        .or_else(|| decision.get("name"))
        .and_then(Value::as_str)
        .map(str::to_owned)
}
