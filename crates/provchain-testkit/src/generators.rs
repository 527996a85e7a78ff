//! Proptest generators for property-based testing.

use proptest::prelude::*;
use serde_json::{json, Value};

use provchain_core::Bundle;

use crate::fixtures::continuous_chain_value;

/// Generate a pipeline step label, e.g. `train.v1`.
pub fn step_name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,11}\\.v[0-9]".prop_map(String::from)
}

/// Generate a trace identifier.
pub fn trace_id() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9-]{3,15}".prop_map(String::from)
}

/// Generate a JSON scalar (null, bool, integer, or short string).
pub fn json_scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| json!(n)),
        "[a-zA-Z0-9 _.-]{0,16}".prop_map(Value::String),
    ]
}

/// Generate an arbitrary JSON value of bounded depth and size.
pub fn json_value() -> impl Strategy<Value = Value> {
    json_scalar().prop_recursive(4, 64, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::btree_map("[a-z]{1,8}", inner, 0..6)
                .prop_map(|map| Value::Object(map.into_iter().collect())),
        ]
    })
}

/// Parameters for generating a well-formed bundle.
#[derive(Debug, Clone)]
pub struct ChainParams {
    pub trace_id: String,
    pub steps: Vec<String>,
}

impl Arbitrary for ChainParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (trace_id(), prop::collection::vec(step_name(), 0..8))
            .prop_map(|(trace_id, steps)| ChainParams { trace_id, steps })
            .boxed()
    }
}

/// Build a bundle from chain parameters.
pub fn bundle_from_params(params: &ChainParams) -> Bundle {
    let steps: Vec<&str> = params.steps.iter().map(String::as_str).collect();
    Bundle::from_value(continuous_chain_value(&params.trace_id, &steps))
        .expect("generated bundles parse")
}
