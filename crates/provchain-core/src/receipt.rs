//! Receipt: one causally-ordered unit of provenance evidence.
//!
//! Receipts arrive as pipeline-emitted JSON. Parsing is total: a field that
//! is absent or wrongly typed comes out as `None`, so downstream checks can
//! degrade to `false` instead of aborting the whole verification.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// The content identifier of a receipt, as emitted by the pipeline.
///
/// Opaque to the verifier: continuity only compares these for equality.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReceiptHash(String);

impl ReceiptHash {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReceiptHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for ReceiptHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ReceiptHash({})", self.0)
    }
}

impl From<&str> for ReceiptHash {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ReceiptHash {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A parsed view of one receipt in a chain.
///
/// The bundle keeps the raw JSON for canonicalization; this view only
/// carries what the checkers and projectors need.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Receipt {
    /// Content identifier of this receipt, unique within a well-formed chain.
    pub receipt_hash: Option<ReceiptHash>,

    /// Content identifier of the predecessor; absent for the chain root.
    pub prev_receipt_hash: Option<ReceiptHash>,

    /// Pipeline-claimed timestamp (RFC 3339 text, treated as opaque).
    pub ts: Option<String>,

    /// Normalized step metadata.
    pub normalized: Normalized,
}

impl Receipt {
    /// Build a receipt view from raw JSON. Total on any input.
    pub fn from_value(value: &Value) -> Self {
        Self {
            receipt_hash: str_field(value, "receipt_hash").map(ReceiptHash::from),
            prev_receipt_hash: str_field(value, "prev_receipt_hash").map(ReceiptHash::from),
            ts: str_field(value, "ts")
                .or_else(|| str_field(value, "timestamp"))
                .map(str::to_owned),
            normalized: value
                .get("normalized")
                .map(Normalized::from_value)
                .unwrap_or_default(),
        }
    }

    /// The human-readable pipeline stage label, if present.
    pub fn step(&self) -> Option<&str> {
        self.normalized.step.as_deref()
    }
}

/// Normalized step metadata attached to a receipt.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Normalized {
    /// Stage label, e.g. `ingest.v1`.
    pub step: Option<String>,

    /// Model identifier claimed by the step.
    pub model_id: Option<String>,

    /// Raw policy block (engine, decisions), kept opaque here.
    pub policy: Option<Value>,

    /// Legacy flat decision list carried outside the policy block.
    pub policy_decisions: Vec<Value>,

    /// Dataset chunk lists, merging the singular and plural field forms.
    pub datasets: Vec<Dataset>,

    /// Safety flags, e.g. `nsfw`, `malware`.
    pub safety: BTreeMap<String, bool>,

    /// Step metrics, e.g. `loss`.
    pub metrics: Map<String, Value>,
}

impl Normalized {
    /// Build a normalized view from raw JSON. Total on any input.
    pub fn from_value(value: &Value) -> Self {
        let mut datasets = Vec::new();
        if let Some(one) = value.get("dataset") {
            datasets.push(Dataset::from_value(one));
        }
        if let Some(Value::Array(many)) = value.get("datasets") {
            datasets.extend(many.iter().map(Dataset::from_value));
        }

        let safety = match value.get("safety") {
            Some(Value::Object(map)) => map
                .iter()
                .filter_map(|(k, v)| v.as_bool().map(|b| (k.clone(), b)))
                .collect(),
            _ => BTreeMap::new(),
        };

        let metrics = match value.get("metrics") {
            Some(Value::Object(map)) => map.clone(),
            _ => Map::new(),
        };

        let policy_decisions = match value.get("policy_decisions") {
            Some(Value::Array(items)) => items.clone(),
            _ => Vec::new(),
        };

        Self {
            step: str_field(value, "step").map(str::to_owned),
            model_id: str_field(value, "model_id")
                .or_else(|| {
                    value
                        .get("model")
                        .and_then(|m| m.get("id"))
                        .and_then(Value::as_str)
                })
                .map(str::to_owned),
            policy: value.get("policy").cloned(),
            policy_decisions,
            datasets,
            safety,
            metrics,
        }
    }
}

/// One dataset referenced by a receipt: an ordered list of content chunks.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    pub chunks: Vec<DatasetChunk>,
}

impl Dataset {
    pub fn from_value(value: &Value) -> Self {
        let chunks = match value.get("chunks") {
            Some(Value::Array(items)) => items
                .iter()
                .map(|chunk| DatasetChunk {
                    cid: str_field(chunk, "cid").map(str::to_owned),
                    size: chunk.get("size").and_then(Value::as_u64),
                })
                .collect(),
            _ => Vec::new(),
        };
        Self { chunks }
    }
}

/// A single content chunk inside a dataset.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DatasetChunk {
    pub cid: Option<String>,
    pub size: Option<u64>,
}

fn str_field<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value.get(key).and_then(Value::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value_full_receipt() {
        let value = json!({
            "trace_id": "t1",
            "receipt_hash": "r2",
            "prev_receipt_hash": "r1",
            "ts": "2024-01-01T00:00:05Z",
            "normalized": {
                "step": "train.v1",
                "metrics": {"loss": 0.12},
                "safety": {"nsfw": true, "malware": false}
            }
        });

        let receipt = Receipt::from_value(&value);
        assert_eq!(receipt.receipt_hash, Some(ReceiptHash::from("r2")));
        assert_eq!(receipt.prev_receipt_hash, Some(ReceiptHash::from("r1")));
        assert_eq!(receipt.ts.as_deref(), Some("2024-01-01T00:00:05Z"));
        assert_eq!(receipt.step(), Some("train.v1"));
        assert_eq!(receipt.normalized.safety.get("nsfw"), Some(&true));
        assert_eq!(
            receipt.normalized.metrics.get("loss"),
            Some(&json!(0.12))
        );
    }

    #[test]
    fn test_from_value_degrades_on_missing_fields() {
        let receipt = Receipt::from_value(&json!({}));
        assert_eq!(receipt.receipt_hash, None);
        assert_eq!(receipt.prev_receipt_hash, None);
        assert_eq!(receipt.ts, None);
        assert_eq!(receipt.step(), None);
    }

    #[test]
    fn test_from_value_degrades_on_wrong_types() {
        let value = json!({
            "receipt_hash": 42,
            "prev_receipt_hash": ["r1"],
            "ts": {"iso": "2024-01-01"},
            "normalized": "not-an-object"
        });
        let receipt = Receipt::from_value(&value);
        assert_eq!(receipt.receipt_hash, None);
        assert_eq!(receipt.prev_receipt_hash, None);
        assert_eq!(receipt.ts, None);
        assert_eq!(receipt.normalized, Normalized::default());
    }

    #[test]
    fn test_timestamp_field_fallback() {
        let receipt = Receipt::from_value(&json!({"timestamp": "2024-02-02T00:00:00Z"}));
        assert_eq!(receipt.ts.as_deref(), Some("2024-02-02T00:00:00Z"));

        // `ts` wins when both are present.
        let receipt = Receipt::from_value(&json!({
            "ts": "2024-01-01T00:00:00Z",
            "timestamp": "2024-02-02T00:00:00Z"
        }));
        assert_eq!(receipt.ts.as_deref(), Some("2024-01-01T00:00:00Z"));
    }

    #[test]
    fn test_datasets_merge_singular_and_plural() {
        let value = json!({
            "dataset": {"chunks": [{"cid": "c1", "size": 10}]},
            "datasets": [
                {"chunks": [{"cid": "c2", "size": 10}, {"cid": "c3"}]}
            ]
        });
        let normalized = Normalized::from_value(&value);
        assert_eq!(normalized.datasets.len(), 2);
        assert_eq!(normalized.datasets[0].chunks.len(), 1);
        assert_eq!(normalized.datasets[1].chunks.len(), 2);
        assert_eq!(normalized.datasets[1].chunks[1].cid.as_deref(), Some("c3"));
        assert_eq!(normalized.datasets[1].chunks[1].size, None);
    }

    #[test]
    fn test_model_id_fallback() {
        let normalized = Normalized::from_value(&json!({"model_id": "m-1"}));
        assert_eq!(normalized.model_id.as_deref(), Some("m-1"));

        let normalized = Normalized::from_value(&json!({"model": {"id": "m-2"}}));
        assert_eq!(normalized.model_id.as_deref(), Some("m-2"));
    }
}
