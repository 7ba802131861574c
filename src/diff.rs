//! Structural diff between two graph snapshots
//!
//! Partitions nodes and edges into added/removed/modified/unchanged in a
//! single pass over each snapshot, regrouping every node classification by
//! domain and by node type as it is made. Output ordering follows the
//! snapshots' own collection order, never a sort.

use crate::fields::changed_fields;
use crate::model::{Edge, EdgeType, GraphSnapshot, Node, NodeType};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// A node present in both snapshots with at least one tracked field changed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModifiedNode {
    pub before: Node,
    pub after: Node,
    /// Tracked field names that differ, in catalog order
    pub changed_fields: Vec<String>,
}

/// Four-way node classification
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeDiff {
    pub added: Vec<Node>,
    pub removed: Vec<Node>,
    pub modified: Vec<ModifiedNode>,
    pub unchanged: Vec<Node>,
}

/// An edge present in both snapshots with at least one compared field changed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModifiedEdge {
    pub before: Edge,
    pub after: Edge,
    pub changed_fields: Vec<String>,
}

/// Four-way edge classification
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EdgeDiff {
    pub added: Vec<Edge>,
    pub removed: Vec<Edge>,
    pub modified: Vec<ModifiedEdge>,
    pub unchanged: Vec<Edge>,
}

/// Summary counters over the whole diff
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffStats {
    pub nodes_added: usize,
    pub nodes_removed: usize,
    pub nodes_modified: usize,
    pub nodes_unchanged: usize,
    pub edges_added: usize,
    pub edges_removed: usize,
    pub edges_modified: usize,
    pub edges_unchanged: usize,
}

/// Complete structural diff between two snapshots
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphDiff {
    pub nodes: NodeDiff,
    pub edges: EdgeDiff,
    pub stats: DiffStats,
    /// Node classifications regrouped by the node's `domain`
    pub nodes_by_domain: IndexMap<String, NodeDiff>,
    /// Node classifications regrouped by variant
    pub nodes_by_type: IndexMap<NodeType, NodeDiff>,
}

enum NodeChange {
    Added(Node),
    Removed(Node),
    Modified(ModifiedNode),
    Unchanged(Node),
}

fn apply(diff: &mut NodeDiff, change: &NodeChange) {
    match change {
        NodeChange::Added(n) => diff.added.push(n.clone()),
        NodeChange::Removed(n) => diff.removed.push(n.clone()),
        NodeChange::Modified(m) => diff.modified.push(m.clone()),
        NodeChange::Unchanged(n) => diff.unchanged.push(n.clone()),
    }
}

fn record(
    nodes: &mut NodeDiff,
    by_domain: &mut IndexMap<String, NodeDiff>,
    by_type: &mut IndexMap<NodeType, NodeDiff>,
    change: NodeChange,
) {
    let (domain, node_type) = match &change {
        NodeChange::Added(n) | NodeChange::Removed(n) | NodeChange::Unchanged(n) => {
            (n.domain.clone(), n.node_type())
        }
        NodeChange::Modified(m) => (m.after.domain.clone(), m.after.node_type()),
    };
    apply(nodes, &change);
    apply(by_domain.entry(domain).or_default(), &change);
    apply(by_type.entry(node_type).or_default(), &change);
}

/// Fields compared between two edges sharing an endpoint pair
const EDGE_FIELDS: [&str; 4] = ["type", "payload", "sourceLocation", "metadata"];

fn edge_field_value(edge: &Edge, field: &str) -> Option<Value> {
    match field {
        "type" => edge
            .edge_type
            .map(|t| Value::String(EdgeType::label(Some(t)).to_string())),
        "payload" => edge.payload.clone(),
        "sourceLocation" => edge
            .source_location
            .as_ref()
            .and_then(|loc| serde_json::to_value(loc).ok()),
        "metadata" => edge.metadata.clone(),
        _ => None,
    }
}

fn edge_changed_fields(before: &Edge, after: &Edge) -> Vec<String> {
    EDGE_FIELDS
        .iter()
        .filter(|field| edge_field_value(before, field) != edge_field_value(after, field))
        .map(|field| field.to_string())
        .collect()
}

/// Compute the structural diff between `before` and `after`.
///
/// Runs in O(N+M) via hash-map indexing. Nodes are matched by `id`; edges are
/// matched by their `(source, target)` pair, so an edge keeps its identity
/// across snapshots regardless of metadata. If one snapshot contains several
/// edges with the same endpoint pair, the last one wins in the index — a
/// known simplification.
pub fn diff_graphs(before: &GraphSnapshot, after: &GraphSnapshot) -> GraphDiff {
    let before_index = before.node_index();
    let after_index = after.node_index();

    let mut nodes = NodeDiff::default();
    let mut nodes_by_domain: IndexMap<String, NodeDiff> = IndexMap::new();
    let mut nodes_by_type: IndexMap<NodeType, NodeDiff> = IndexMap::new();

    for node in &after.nodes {
        let change = match before_index.get(node.id.as_str()) {
            None => NodeChange::Added(node.clone()),
            Some(prev) => {
                let changed = changed_fields(prev, node);
                if changed.is_empty() {
                    NodeChange::Unchanged(node.clone())
                } else {
                    NodeChange::Modified(ModifiedNode {
                        before: (*prev).clone(),
                        after: node.clone(),
                        changed_fields: changed,
                    })
                }
            }
        };
        record(&mut nodes, &mut nodes_by_domain, &mut nodes_by_type, change);
    }

    for node in &before.nodes {
        if !after_index.contains_key(node.id.as_str()) {
            record(
                &mut nodes,
                &mut nodes_by_domain,
                &mut nodes_by_type,
                NodeChange::Removed(node.clone()),
            );
        }
    }

    fn index_edges(snapshot: &GraphSnapshot) -> IndexMap<(String, String), Edge> {
        let mut map = IndexMap::new();
        for edge in &snapshot.edges {
            map.insert(edge.endpoint_key(), edge.clone());
        }
        map
    }
    let before_edges = index_edges(before);
    let after_edges = index_edges(after);

    let mut edges = EdgeDiff::default();
    for (key, edge) in &after_edges {
        match before_edges.get(key) {
            None => edges.added.push(edge.clone()),
            Some(prev) => {
                let changed = edge_changed_fields(prev, edge);
                if changed.is_empty() {
                    edges.unchanged.push(edge.clone());
                } else {
                    edges.modified.push(ModifiedEdge {
                        before: prev.clone(),
                        after: edge.clone(),
                        changed_fields: changed,
                    });
                }
            }
        }
    }
    for (key, edge) in &before_edges {
        if !after_edges.contains_key(key) {
            edges.removed.push(edge.clone());
        }
    }

    let stats = DiffStats {
        nodes_added: nodes.added.len(),
        nodes_removed: nodes.removed.len(),
        nodes_modified: nodes.modified.len(),
        nodes_unchanged: nodes.unchanged.len(),
        edges_added: edges.added.len(),
        edges_removed: edges.removed.len(),
        edges_modified: edges.modified.len(),
        edges_unchanged: edges.unchanged.len(),
    };

    debug!(
        nodes_added = stats.nodes_added,
        nodes_removed = stats.nodes_removed,
        nodes_modified = stats.nodes_modified,
        edges_added = stats.edges_added,
        edges_removed = stats.edges_removed,
        "computed graph diff"
    );

    GraphDiff {
        nodes,
        edges,
        stats,
        nodes_by_domain,
        nodes_by_type,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NodeKind;
    use indexmap::IndexMap;

    fn api_node(id: &str, domain: &str, api_type: &str) -> Node {
        Node {
            id: id.to_string(),
            name: id.to_string(),
            domain: domain.to_string(),
            module: format!("{domain}/api"),
            description: None,
            source_location: None,
            metadata: None,
            kind: NodeKind::Api {
                api_type: api_type.to_string(),
                http_method: None,
                path: None,
            },
        }
    }

    fn snapshot(nodes: Vec<Node>, edges: Vec<Edge>) -> GraphSnapshot {
        GraphSnapshot {
            nodes,
            edges,
            domains: IndexMap::new(),
        }
    }

    #[test]
    fn test_diff_against_self_is_all_unchanged() {
        let g = snapshot(
            vec![api_node("a", "orders", "REST"), api_node("b", "billing", "REST")],
            vec![Edge::new("a", "b")],
        );

        let diff = diff_graphs(&g, &g);
        assert!(diff.nodes.added.is_empty());
        assert!(diff.nodes.removed.is_empty());
        assert!(diff.nodes.modified.is_empty());
        assert_eq!(diff.nodes.unchanged.len(), 2);
        assert!(diff.edges.added.is_empty());
        assert!(diff.edges.removed.is_empty());
        assert!(diff.edges.modified.is_empty());
        assert_eq!(diff.edges.unchanged.len(), 1);
        assert_eq!(diff.stats.nodes_unchanged, 2);
        assert_eq!(diff.stats.edges_unchanged, 1);
    }

    #[test]
    fn test_single_field_change_is_modified() {
        let before = snapshot(vec![api_node("a", "orders", "REST")], vec![]);
        let after = snapshot(vec![api_node("a", "orders", "GraphQL")], vec![]);

        let diff = diff_graphs(&before, &after);
        assert!(diff.nodes.unchanged.is_empty());
        assert_eq!(diff.nodes.modified.len(), 1);
        assert_eq!(diff.nodes.modified[0].changed_fields, vec!["apiType"]);
        assert_eq!(diff.stats.nodes_modified, 1);
    }

    #[test]
    fn test_added_and_removed_nodes() {
        let before = snapshot(vec![api_node("a", "orders", "REST")], vec![]);
        let after = snapshot(vec![api_node("b", "orders", "REST")], vec![]);

        let diff = diff_graphs(&before, &after);
        assert_eq!(diff.nodes.added.len(), 1);
        assert_eq!(diff.nodes.added[0].id, "b");
        assert_eq!(diff.nodes.removed.len(), 1);
        assert_eq!(diff.nodes.removed[0].id, "a");
    }

    #[test]
    fn test_edge_type_change_is_modified() {
        let before = snapshot(
            vec![api_node("a", "orders", "REST"), api_node("b", "billing", "REST")],
            vec![Edge {
                edge_type: Some(EdgeType::Sync),
                ..Edge::new("a", "b")
            }],
        );
        let after = snapshot(
            before.nodes.clone(),
            vec![Edge {
                edge_type: Some(EdgeType::Async),
                ..Edge::new("a", "b")
            }],
        );

        let diff = diff_graphs(&before, &after);
        assert_eq!(diff.edges.modified.len(), 1);
        assert_eq!(diff.edges.modified[0].changed_fields, vec!["type"]);
        assert!(diff.edges.added.is_empty());
        assert!(diff.edges.removed.is_empty());
    }

    #[test]
    fn test_buckets_built_in_same_pass() {
        let before = snapshot(vec![api_node("a", "orders", "REST")], vec![]);
        let after = snapshot(
            vec![api_node("a", "orders", "REST"), api_node("b", "billing", "REST")],
            vec![],
        );

        let diff = diff_graphs(&before, &after);
        let orders = diff.nodes_by_domain.get("orders").unwrap();
        assert_eq!(orders.unchanged.len(), 1);
        let billing = diff.nodes_by_domain.get("billing").unwrap();
        assert_eq!(billing.added.len(), 1);

        let apis = diff.nodes_by_type.get(&NodeType::Api).unwrap();
        assert_eq!(apis.added.len(), 1);
        assert_eq!(apis.unchanged.len(), 1);
    }

    #[test]
    fn test_duplicate_endpoint_pair_last_write_wins() {
        let first = Edge {
            edge_type: Some(EdgeType::Sync),
            ..Edge::new("a", "b")
        };
        let second = Edge {
            edge_type: Some(EdgeType::Async),
            ..Edge::new("a", "b")
        };
        let nodes = vec![api_node("a", "orders", "REST"), api_node("b", "billing", "REST")];
        let g = snapshot(nodes, vec![first, second.clone()]);

        let diff = diff_graphs(&g, &g);
        assert_eq!(diff.edges.unchanged, vec![second]);
    }
}
