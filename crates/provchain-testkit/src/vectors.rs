//! Golden canonical-byte vectors.
//!
//! Every implementation that signs or addresses bundles must produce these
//! exact bytes for these inputs. A signer that drifts from this form (key
//! order, whitespace, escaping, number formatting) produces signatures that
//! silently never match, so the byte form is pinned here character by
//! character.

use serde::Serialize;
use serde_json::Value;

use provchain_core::canonical_bytes;

/// A single golden vector: a JSON input and its exact canonical text.
#[derive(Debug, Clone, Serialize)]
pub struct GoldenVector {
    pub name: &'static str,
    pub description: &'static str,
    pub input: &'static str,
    pub canonical: &'static str,
}

/// All golden vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    vec![
        GoldenVector {
            name: "empty_bundle",
            description: "Minimal bundle: empty chain, already in key order",
            input: r#"{"chain":[],"trace_id":"t1"}"#,
            canonical: r#"{"chain":[],"trace_id":"t1"}"#,
        },
        GoldenVector {
            name: "key_order_scrambled",
            description: "Same bundle with scrambled key order; identical canonical bytes",
            input: r#"{"trace_id":"t1","chain":[]}"#,
            canonical: r#"{"chain":[],"trace_id":"t1"}"#,
        },
        GoldenVector {
            name: "single_receipt",
            description: "One receipt with a normalized step",
            input: r#"{"trace_id":"demo","chain":[{"receipt_hash":"r1","ts":"2024-01-01T00:00:00Z","normalized":{"step":"ingest.v1"}}]}"#,
            canonical: r#"{"chain":[{"normalized":{"step":"ingest.v1"},"receipt_hash":"r1","ts":"2024-01-01T00:00:00Z"}],"trace_id":"demo"}"#,
        },
        GoldenVector {
            name: "two_hop_chain",
            description: "Two linked receipts; array order is preserved, keys sort inside each receipt",
            input: r#"{"trace_id":"demo","chain":[{"receipt_hash":"r1","ts":"2024-01-01T00:00:00Z"},{"receipt_hash":"r2","prev_receipt_hash":"r1","ts":"2024-01-01T00:00:05Z"}]}"#,
            canonical: r#"{"chain":[{"receipt_hash":"r1","ts":"2024-01-01T00:00:00Z"},{"prev_receipt_hash":"r1","receipt_hash":"r2","ts":"2024-01-01T00:00:05Z"}],"trace_id":"demo"}"#,
        },
        GoldenVector {
            name: "scalars_and_null",
            description: "Booleans, null, integer, and float formatting",
            input: r#"{"ok":true,"sig":null,"count":3,"ratio":0.5}"#,
            canonical: r#"{"count":3,"ok":true,"ratio":0.5,"sig":null}"#,
        },
        GoldenVector {
            name: "empty_collections",
            description: "Empty objects and arrays keep their tokens",
            input: r#"{"refs":[],"attrs":{},"chain":[]}"#,
            canonical: r#"{"attrs":{},"chain":[],"refs":[]}"#,
        },
        GoldenVector {
            name: "string_escapes",
            description: "UTF-8 kept raw; quotes and control characters escaped",
            input: r#"{"quote":"say \"hi\"","label":"café","note":"line1\nline2"}"#,
            canonical: r#"{"label":"café","note":"line1\nline2","quote":"say \"hi\""}"#,
        },
        GoldenVector {
            name: "nested_sorting",
            description: "Keys sort at every nesting level; arrays never reorder",
            input: r#"{"b":{"z":1,"a":[{"y":2,"x":1}]},"a":0}"#,
            canonical: r#"{"a":0,"b":{"a":[{"x":1,"y":2}],"z":1}}"#,
        },
        GoldenVector {
            name: "numbers",
            description: "Negative, integer beyond 2^53, and exact binary float",
            input: r#"{"loss":0.125,"epochs":3,"samples":9007199254740993,"delta":-4}"#,
            canonical: r#"{"delta":-4,"epochs":3,"loss":0.125,"samples":9007199254740993}"#,
        },
    ]
}

/// Check every vector against the canonicalizer.
pub fn verify_all_vectors() -> Result<(), String> {
    for vector in all_vectors() {
        let value: Value = serde_json::from_str(vector.input)
            .map_err(|e| format!("{}: input does not parse: {}", vector.name, e))?;
        let bytes = canonical_bytes(&value)
            .map_err(|e| format!("{}: canonicalization failed: {}", vector.name, e))?;
        let text = String::from_utf8(bytes)
            .map_err(|e| format!("{}: canonical bytes not UTF-8: {}", vector.name, e))?;
        if text != vector.canonical {
            return Err(format!(
                "{}: canonical mismatch\n  expected: {}\n  actual:   {}",
                vector.name, vector.canonical, text
            ));
        }
    }
    Ok(())
}
