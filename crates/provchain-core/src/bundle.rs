//! Bundle: the exported envelope wrapping an ordered receipt chain.
//!
//! A bundle is canonicalized and content-addressed as a whole, so the raw
//! JSON value is kept exactly as fetched; the parsed receipt list is only a
//! view. Re-serializing a typed struct would silently drop unknown fields
//! and change the CID.

use serde_json::Value;

use crate::error::BundleError;
use crate::receipt::Receipt;

/// A fetched receipt bundle: raw value plus parsed views.
///
/// Owned exclusively by the verification request that fetched it; derived
/// values (CID, verdict, projection) are copied out, never aliased back.
#[derive(Debug, Clone, PartialEq)]
pub struct Bundle {
    raw: Value,
    trace_id: Option<String>,
    receipts: Vec<Receipt>,
}

impl Bundle {
    /// Parse a bundle from its raw JSON value.
    ///
    /// The receipt sequence is read from `chain`, falling back to the
    /// legacy `hops` field; `chain` wins when both are present. A bundle
    /// with neither field has an empty chain. A receipts field that is
    /// present but not an array is a structural fault.
    pub fn from_value(raw: Value) -> Result<Self, BundleError> {
        let receipts_field = [raw.get("chain"), raw.get("hops")]
            .into_iter()
            .flatten()
            .find(|v| !v.is_null());

        let receipts = match receipts_field {
            Some(Value::Array(items)) => items.iter().map(Receipt::from_value).collect(),
            Some(_) => return Err(BundleError::ReceiptsNotArray),
            None => Vec::new(),
        };

        let trace_id = raw
            .get("trace_id")
            .and_then(Value::as_str)
            .map(str::to_owned);

        Ok(Self {
            raw,
            trace_id,
            receipts,
        })
    }

    /// The raw JSON value exactly as fetched. This is the canonicalization
    /// and signing input.
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    /// The trace identifier claimed by the bundle, if any.
    pub fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }

    /// The ordered receipt sequence.
    pub fn receipts(&self) -> &[Receipt] {
        &self.receipts
    }

    /// The bundle timestamp: the top-level `ts`, or the last receipt's.
    ///
    /// This is the `ts` component of the `cid|trace|ts` signing message.
    pub fn ts(&self) -> Option<&str> {
        self.raw
            .get("ts")
            .and_then(Value::as_str)
            .or_else(|| self.receipts.last().and_then(|r| r.ts.as_deref()))
    }
}
