//! Policy decision extraction across a chain.
//!
//! Receipts may carry a `normalized.policy` block recording the engine that
//! evaluated the step and its decisions. Decisions are opaque pipeline
//! objects; only the outcome field is interpreted, and anything that is not
//! an explicit allow counts as a breach.

use serde::Serialize;
use serde_json::Value;

use provchain_core::{Bundle, Receipt};

/// Outcomes that do not count as breaches.
const ALLOW_OUTCOMES: [&str; 3] = ["allow", "pass", "ok"];

/// Policy activity aggregated over one trace.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct PolicySummary {
    pub trace_id: Option<String>,
    pub engines: Vec<String>,
    pub decisions: Vec<Value>,
    pub breaches: Vec<Value>,
    pub breach_count: usize,
}

/// Scan a bundle's receipts for policy engines, decisions, and breaches.
pub fn summarize_policy(bundle: &Bundle) -> PolicySummary {
    let mut summary = PolicySummary {
        trace_id: bundle.trace_id().map(str::to_owned),
        ..Default::default()
    };

    for receipt in bundle.receipts() {
        if let Some(engine) = policy_engine(receipt) {
            if !summary.engines.iter().any(|e| e == engine) {
                summary.engines.push(engine.to_owned());
            }
        }
        for decision in receipt_decisions(receipt) {
            if is_breach(&decision) {
                summary.breaches.push(decision.clone());
            }
            summary.decisions.push(decision);
        }
    }

    summary.breach_count = summary.breaches.len();
    summary
}

/// The engine named by a receipt's policy block, if any.
fn policy_engine(receipt: &Receipt) -> Option<&str> {
    let policy = receipt.normalized.policy.as_ref()?.as_object()?;
    policy
        .get("engine")
        .or_else(|| policy.get("policy_engine"))
        .and_then(Value::as_str)
}

/// The decision objects recorded by a receipt.
///
/// Reads `policy.decisions`, falling back to the legacy flat
/// `policy_decisions` list; non-object entries are dropped.
pub(crate) fn receipt_decisions(receipt: &Receipt) -> Vec<Value> {
    let from_policy = receipt
        .normalized
        .policy
        .as_ref()
        .and_then(Value::as_object)
        .and_then(|policy| policy.get("decisions"))
        .and_then(Value::as_array);

    from_policy
        .cloned()
        .unwrap_or_else(|| receipt.normalized.policy_decisions.clone())
        .into_iter()
        .filter(Value::is_object)
        .collect()
}

/// The lowercased outcome of a decision, under any of its field spellings.
pub(crate) fn decision_outcome(decision: &Value) -> Option<String> {
    ["outcome", "result", "decision"]
        .iter()
        .find_map(|key| decision.get(*key).and_then(Value::as_str))
        .map(str::to_ascii_lowercase)
}

/// Whether a decision counts as a breach. A decision with no outcome field
/// is not a breach; only an explicit non-allow outcome is.
pub(crate) fn is_breach(decision: &Value) -> bool {
    decision_outcome(decision)
        .map_or(false, |outcome| !ALLOW_OUTCOMES.contains(&outcome.as_str()))
}
