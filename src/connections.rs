//! Cross-domain connection aggregation
//!
//! Collapses node-level edges that cross a domain boundary into one summary
//! per `(source domain, target domain)` pair, and diffs those summaries
//! between two snapshots by pair presence alone.

use crate::model::{EdgeType, GraphSnapshot, NodeType};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// One node-level edge behind a domain-pair summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionDetail {
    pub source_node_name: String,
    pub target_node_name: String,
    /// `"sync"`, `"async"` or `"unknown"` for untyped edges
    pub edge_type: String,
}

/// Aggregated summary of every edge from one domain into another
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainConnection {
    pub source_domain: String,
    pub target_domain: String,
    /// Edges whose target node is an API
    pub api_count: usize,
    /// Edges whose target node is an event handler
    pub event_count: usize,
    pub details: Vec<ConnectionDetail>,
}

/// Result of aggregating one snapshot's cross-domain edges
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainConnectionAggregation {
    /// One summary per observed `(source, target)` domain pair, in the order
    /// the pairs were first seen while walking the snapshot's edges
    pub connections: Vec<DomainConnection>,
    /// Union of every node's `domain` value, in first-observed order
    pub domains: Vec<String>,
}

impl DomainConnectionAggregation {
    /// Look up the summary for one domain pair
    pub fn get(&self, source_domain: &str, target_domain: &str) -> Option<&DomainConnection> {
        self.connections
            .iter()
            .find(|c| c.source_domain == source_domain && c.target_domain == target_domain)
    }
}

/// Presence-only diff of domain-pair summaries between two snapshots
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainConnectionDiffResult {
    /// Pairs present only in `after`
    pub added: Vec<DomainConnection>,
    /// Pairs present only in `before`
    pub removed: Vec<DomainConnection>,
    /// Pairs present in both, carrying the `after` snapshot's summary
    pub unchanged: Vec<DomainConnection>,
}

/// Aggregate every cross-domain edge of `snapshot` into domain-pair summaries.
///
/// Edges with an unresolvable endpoint and edges whose endpoints share a
/// domain are skipped silently.
pub fn aggregate_connections(snapshot: &GraphSnapshot) -> DomainConnectionAggregation {
    let index = snapshot.node_index();
    let mut pairs: IndexMap<(String, String), DomainConnection> = IndexMap::new();

    for edge in &snapshot.edges {
        let (Some(source), Some(target)) = (
            index.get(edge.source.as_str()),
            index.get(edge.target.as_str()),
        ) else {
            trace!(source = %edge.source, target = %edge.target, "skipping dangling edge");
            continue;
        };
        if source.domain == target.domain {
            continue;
        }

        let key = (source.domain.clone(), target.domain.clone());
        let connection = pairs.entry(key).or_insert_with(|| DomainConnection {
            source_domain: source.domain.clone(),
            target_domain: target.domain.clone(),
            api_count: 0,
            event_count: 0,
            details: Vec::new(),
        });

        match target.node_type() {
            NodeType::Api => connection.api_count += 1,
            NodeType::EventHandler => connection.event_count += 1,
            _ => {}
        }
        connection.details.push(ConnectionDetail {
            source_node_name: source.name.clone(),
            target_node_name: target.name.clone(),
            edge_type: EdgeType::label(edge.edge_type).to_string(),
        });
    }

    debug!(pairs = pairs.len(), "aggregated cross-domain connections");

    DomainConnectionAggregation {
        connections: pairs.into_values().collect(),
        domains: snapshot.domain_names(),
    }
}

/// Aggregate only the pairs touching `domain` as source or target.
pub fn aggregate_connections_for_domain(
    snapshot: &GraphSnapshot,
    domain: &str,
) -> Vec<DomainConnection> {
    aggregate_connections(snapshot)
        .connections
        .into_iter()
        .filter(|c| c.source_domain == domain || c.target_domain == domain)
        .collect()
}

/// Diff the domain-pair summaries of two snapshots by pair presence.
///
/// Classification ignores the aggregated counts and detail lists: a pair that
/// exists in both snapshots is `unchanged` even when its api/event counts
/// differ between versions.
pub fn diff_connections(
    before: &GraphSnapshot,
    after: &GraphSnapshot,
) -> DomainConnectionDiffResult {
    let before_agg = aggregate_connections(before);
    let after_agg = aggregate_connections(after);

    let removed = before_agg
        .connections
        .iter()
        .filter(|c| after_agg.get(&c.source_domain, &c.target_domain).is_none())
        .cloned()
        .collect();

    let mut added = Vec::new();
    let mut unchanged = Vec::new();
    for connection in after_agg.connections {
        if before_agg
            .get(&connection.source_domain, &connection.target_domain)
            .is_some()
        {
            unchanged.push(connection);
        } else {
            added.push(connection);
        }
    }

    DomainConnectionDiffResult {
        added,
        removed,
        unchanged,
    }
}
