//! Canonical JSON encoding for deterministic serialization.
//!
//! The canonical form:
//! - Object keys sorted lexicographically by Unicode code point
//! - Array order preserved (it carries chain order)
//! - Compact separators, no whitespace
//! - Strings escaped exactly as `serde_json` escapes them, UTF-8 kept raw
//! - Numbers written by `serde_json`'s integer/shortest-float writer
//!
//! This byte form is also the signing form. A signer that normalizes
//! anything else (whitespace, number formatting, key casing) will produce
//! signatures that never match.

use serde_json::Value;

use crate::error::CanonicalizationError;

/// Maximum nesting depth accepted by the canonicalizer.
///
/// `Value` is a tree and cannot alias itself, so a depth limit is the
/// deterministic stand-in for cycle detection.
pub const MAX_DEPTH: usize = 128;

/// Encode a JSON value to canonical bytes.
///
/// Two logically equal values (same keys and values, any insertion order)
/// produce identical bytes. Fails on non-finite numbers and on nesting
/// deeper than [`MAX_DEPTH`]; never truncates or reorders array data.
pub fn canonical_bytes(value: &Value) -> Result<Vec<u8>, CanonicalizationError> {
    let mut buf = Vec::new();
    write_value(&mut buf, value, 0)?;
    Ok(buf)
}

fn write_value(
    buf: &mut Vec<u8>,
    value: &Value,
    depth: usize,
) -> Result<(), CanonicalizationError> {
    if depth > MAX_DEPTH {
        return Err(CanonicalizationError::DepthLimitExceeded(MAX_DEPTH));
    }

    match value {
        Value::Null => buf.extend_from_slice(b"null"),
        Value::Bool(true) => buf.extend_from_slice(b"true"),
        Value::Bool(false) => buf.extend_from_slice(b"false"),
        Value::Number(n) => {
            if let Some(f) = n.as_f64() {
                if !f.is_finite() {
                    return Err(CanonicalizationError::NonFiniteNumber);
                }
            }
            serde_json::to_writer(&mut *buf, n)
                .map_err(|e| CanonicalizationError::Write(e.to_string()))?;
        }
        Value::String(s) => {
            serde_json::to_writer(&mut *buf, s)
                .map_err(|e| CanonicalizationError::Write(e.to_string()))?;
        }
        Value::Array(items) => {
            buf.push(b'[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    buf.push(b',');
                }
                write_value(buf, item, depth + 1)?;
            }
            buf.push(b']');
        }
        Value::Object(map) => {
            // Sort explicitly rather than relying on the map's iteration
            // order, which depends on serde_json feature flags.
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));

            buf.push(b'{');
            for (i, (key, val)) in entries.iter().enumerate() {
                if i > 0 {
                    buf.push(b',');
                }
                serde_json::to_writer(&mut *buf, key)
                    .map_err(|e| CanonicalizationError::Write(e.to_string()))?;
                buf.push(b':');
                write_value(buf, val, depth + 1)?;
            }
            buf.push(b'}');
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn canonical_str(value: &Value) -> String {
        String::from_utf8(canonical_bytes(value).unwrap()).unwrap()
    }

    #[test]
    fn test_keys_sorted() {
        let value: Value = serde_json::from_str(r#"{"b":2,"a":1}"#).unwrap();
        assert_eq!(canonical_str(&value), r#"{"a":1,"b":2}"#);
    }

    #[test]
    fn test_nested_keys_sorted() {
        let value = json!({"outer": {"z": [1, 2], "a": {"y": 0, "x": 0}}});
        assert_eq!(
            canonical_str(&value),
            r#"{"outer":{"a":{"x":0,"y":0},"z":[1,2]}}"#
        );
    }

    #[test]
    fn test_array_order_preserved() {
        let value = json!(["c", "a", "b"]);
        assert_eq!(canonical_str(&value), r#"["c","a","b"]"#);
    }

    #[test]
    fn test_empty_collections() {
        assert_eq!(canonical_str(&json!({})), "{}");
        assert_eq!(canonical_str(&json!([])), "[]");
        assert_eq!(canonical_str(&json!({"a": {}, "b": []})), r#"{"a":{},"b":[]}"#);
    }

    #[test]
    fn test_scalars() {
        let value = json!({"f": false, "n": null, "t": true});
        assert_eq!(canonical_str(&value), r#"{"f":false,"n":null,"t":true}"#);
    }

    #[test]
    fn test_number_formatting() {
        let value = json!({"big": 1234567890123i64, "half": 1.5, "i": 7});
        assert_eq!(
            canonical_str(&value),
            r#"{"big":1234567890123,"half":1.5,"i":7}"#
        );
    }

    #[test]
    fn test_string_escaping() {
        let value = json!({"k": "a\"b\n"});
        assert_eq!(canonical_str(&value), "{\"k\":\"a\\\"b\\n\"}");
    }

    #[test]
    fn test_non_ascii_kept_raw() {
        let value = json!({"k": "héllo"});
        assert_eq!(canonical_str(&value), "{\"k\":\"héllo\"}");
    }

    #[test]
    fn test_deterministic() {
        let value = json!({"chain": [{"receipt_hash": "a"}], "trace_id": "t1"});
        assert_eq!(
            canonical_bytes(&value).unwrap(),
            canonical_bytes(&value).unwrap()
        );
    }

    #[test]
    fn test_key_order_invariance_across_parses() {
        let v1: Value = serde_json::from_str(r#"{"a":1,"b":{"c":2,"d":3}}"#).unwrap();
        let v2: Value = serde_json::from_str(r#"{"b":{"d":3,"c":2},"a":1}"#).unwrap();
        assert_eq!(canonical_bytes(&v1).unwrap(), canonical_bytes(&v2).unwrap());
    }

    #[test]
    fn test_depth_limit() {
        let mut value = json!(0);
        for _ in 0..(MAX_DEPTH + 2) {
            value = Value::Array(vec![value]);
        }
        assert_eq!(
            canonical_bytes(&value),
            Err(CanonicalizationError::DepthLimitExceeded(MAX_DEPTH))
        );
    }
}
