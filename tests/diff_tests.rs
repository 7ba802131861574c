//! Graph diff integration tests

use archgraph_analysis::{
    diff_graphs, Edge, EdgeType, GraphSnapshot, Node, NodeKind,
};
use indexmap::IndexMap;
use std::collections::HashSet;

fn api(id: &str, domain: &str) -> Node {
    Node {
        id: id.to_string(),
        name: format!("{id} endpoint"),
        domain: domain.to_string(),
        module: format!("{domain}/api"),
        description: None,
        source_location: None,
        metadata: None,
        kind: NodeKind::Api {
            api_type: "REST".to_string(),
            http_method: Some("GET".to_string()),
            path: Some(format!("/{id}")),
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
fn adding_one_node_is_the_only_change() {
    let before = snapshot(vec![api("api1", "orders")], vec![]);
    let after = snapshot(vec![api("api1", "orders"), api("api2", "orders")], vec![]);

    let diff = diff_graphs(&before, &after);

    let added: Vec<&str> = diff.nodes.added.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(added, vec!["api2"]);
    assert_eq!(diff.stats.nodes_added, 1);
    assert_eq!(diff.stats.nodes_removed, 0);
    assert_eq!(diff.stats.nodes_modified, 0);
    assert_eq!(diff.stats.nodes_unchanged, 1);
    assert_eq!(diff.stats.edges_added, 0);
    assert_eq!(diff.stats.edges_removed, 0);
    assert_eq!(diff.stats.edges_modified, 0);
    assert_eq!(diff.stats.edges_unchanged, 0);
}

#[test]
fn node_buckets_partition_the_id_union() {
    let before = snapshot(
        vec![api("kept", "orders"), api("gone", "orders"), api("edited", "billing")],
        vec![],
    );
    let mut edited = api("edited", "billing");
    edited.name = "renamed".to_string();
    let after = snapshot(vec![api("kept", "orders"), edited, api("fresh", "billing")], vec![]);

    let diff = diff_graphs(&before, &after);

    let mut seen: HashSet<String> = HashSet::new();
    for node in diff
        .nodes
        .added
        .iter()
        .chain(&diff.nodes.removed)
        .chain(&diff.nodes.unchanged)
    {
        assert!(seen.insert(node.id.clone()), "{} classified twice", node.id);
    }
    for modified in &diff.nodes.modified {
        assert!(seen.insert(modified.after.id.clone()));
    }

    let union: HashSet<String> = before
        .nodes
        .iter()
        .chain(&after.nodes)
        .map(|n| n.id.clone())
        .collect();
    assert_eq!(seen, union);
}

#[test]
fn changing_one_field_moves_node_to_modified() {
    let before = snapshot(vec![api("a", "orders")], vec![]);
    let mut changed = api("a", "orders");
    changed.kind = NodeKind::Api {
        api_type: "REST".to_string(),
        http_method: Some("POST".to_string()),
        path: Some("/a".to_string()),
    };
    let after = snapshot(vec![changed], vec![]);

    let diff = diff_graphs(&before, &after);
    assert!(diff.nodes.unchanged.is_empty());
    assert_eq!(diff.nodes.modified.len(), 1);
    assert_eq!(diff.nodes.modified[0].changed_fields, vec!["httpMethod"]);
}

#[test]
fn edges_match_by_endpoints_not_metadata() {
    let nodes = vec![api("a", "orders"), api("b", "billing")];
    let before = snapshot(
        nodes.clone(),
        vec![Edge {
            edge_type: Some(EdgeType::Sync),
            ..Edge::new("a", "b")
        }],
    );
    let after = snapshot(
        nodes,
        vec![Edge {
            edge_type: Some(EdgeType::Async),
            ..Edge::new("a", "b")
        }],
    );

    let diff = diff_graphs(&before, &after);
    assert!(diff.edges.added.is_empty());
    assert!(diff.edges.removed.is_empty());
    assert_eq!(diff.edges.modified.len(), 1);
    assert_eq!(diff.edges.modified[0].changed_fields, vec!["type"]);
}

#[test]
fn output_order_follows_snapshot_order() {
    let before = snapshot(vec![], vec![]);
    let after = snapshot(
        vec![api("z", "orders"), api("a", "orders"), api("m", "billing")],
        vec![],
    );

    let diff = diff_graphs(&before, &after);
    let ids: Vec<&str> = diff.nodes.added.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec!["z", "a", "m"]);

    let domains: Vec<&str> = diff.nodes_by_domain.keys().map(|d| d.as_str()).collect();
    assert_eq!(domains, vec!["orders", "billing"]);
}
