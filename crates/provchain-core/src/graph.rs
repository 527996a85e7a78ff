//! Graph projection: a chain rendered as generic node/edge sets.

use serde::Serialize;

use crate::receipt::{Receipt, ReceiptHash};

/// One node per receipt. The id is the receipt hash; a hash-less receipt
/// still gets a node so malformed chains render rather than vanish.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphNode {
    pub id: Option<ReceiptHash>,
    pub ts: Option<String>,
    pub step: Option<String>,
}

/// One directed edge per adjacent receipt pair, earlier to later.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphEdge {
    pub from: Option<ReceiptHash>,
    pub to: Option<ReceiptHash>,
}

/// The projection handed to a renderer. Constructed fresh per request,
/// never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphProjection {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

/// Project an ordered receipt sequence into nodes and edges.
///
/// Deterministic, order-preserving, total: duplicate hashes are not
/// deduplicated and never abort projection.
pub fn project(receipts: &[Receipt]) -> GraphProjection {
    let nodes = receipts
        .iter()
        .map(|r| GraphNode {
            id: r.receipt_hash.clone(),
            ts: r.ts.clone(),
            step: r.step().map(str::to_owned),
        })
        .collect();

    let edges = receipts
        .windows(2)
        .map(|pair| GraphEdge {
            from: pair[0].receipt_hash.clone(),
            to: pair[1].receipt_hash.clone(),
        })
        .collect();

    GraphProjection { nodes, edges }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn receipt(hash: &str, prev: Option<&str>, step: &str, ts: &str) -> Receipt {
        Receipt::from_value(&json!({
            "receipt_hash": hash,
            "prev_receipt_hash": prev,
            "ts": ts,
            "normalized": {"step": step}
        }))
    }

    #[test]
    fn test_cardinality() {
        let chain = vec![
            receipt("A", None, "ingest.v1", "2024-01-01T00:00:00Z"),
            receipt("B", Some("A"), "train.v1", "2024-01-01T00:00:05Z"),
            receipt("C", Some("B"), "eval.v1", "2024-01-01T00:00:10Z"),
        ];
        let projection = project(&chain);
        assert_eq!(projection.nodes.len(), 3);
        assert_eq!(projection.edges.len(), 2);
    }

    #[test]
    fn test_empty_and_singleton() {
        assert!(project(&[]).nodes.is_empty());
        assert!(project(&[]).edges.is_empty());

        let one = project(&[receipt("A", None, "ingest.v1", "2024-01-01T00:00:00Z")]);
        assert_eq!(one.nodes.len(), 1);
        assert!(one.edges.is_empty());
    }

    #[test]
    fn test_edges_follow_chain_order() {
        let chain = vec![
            receipt("A", None, "ingest.v1", "2024-01-01T00:00:00Z"),
            receipt("B", Some("A"), "train.v1", "2024-01-01T00:00:05Z"),
            receipt("C", Some("B"), "eval.v1", "2024-01-01T00:00:10Z"),
        ];
        let projection = project(&chain);
        assert_eq!(projection.edges[0].from, Some(ReceiptHash::from("A")));
        assert_eq!(projection.edges[0].to, Some(ReceiptHash::from("B")));
        assert_eq!(projection.edges[1].from, Some(ReceiptHash::from("B")));
        assert_eq!(projection.edges[1].to, Some(ReceiptHash::from("C")));
    }

    #[test]
    fn test_node_fields() {
        let projection = project(&[receipt("A", None, "ingest.v1", "2024-01-01T00:00:00Z")]);
        let node = &projection.nodes[0];
        assert_eq!(node.id, Some(ReceiptHash::from("A")));
        assert_eq!(node.ts.as_deref(), Some("2024-01-01T00:00:00Z"));
        assert_eq!(node.step.as_deref(), Some("ingest.v1"));
    }

    #[test]
    fn test_duplicate_hashes_project_without_dedup() {
        let chain = vec![
            receipt("A", None, "ingest.v1", "2024-01-01T00:00:00Z"),
            receipt("A", Some("A"), "train.v1", "2024-01-01T00:00:05Z"),
        ];
        let projection = project(&chain);
        assert_eq!(projection.nodes.len(), 2);
        assert_eq!(projection.edges.len(), 1);
    }

    #[test]
    fn test_hashless_receipt_still_projects() {
        let chain = vec![
            Receipt::from_value(&json!({"ts": "2024-01-01T00:00:00Z"})),
            receipt("B", Some("A"), "train.v1", "2024-01-01T00:00:05Z"),
        ];
        let projection = project(&chain);
        assert_eq!(projection.nodes.len(), 2);
        assert_eq!(projection.nodes[0].id, None);
        assert_eq!(projection.edges[0].from, None);
        assert_eq!(projection.edges[0].to, Some(ReceiptHash::from("B")));
    }
}
