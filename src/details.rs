//! Per-domain detail view
//!
//! Composes one snapshot's slice of a single domain: node summaries, event
//! publication and consumption, cross-domain edges, reconstructed entities
//! and aggregated connections. The only lookup that can miss in this crate
//! lives here: asking for a domain with no declared metadata yields `None`.

use crate::connections::{aggregate_connections_for_domain, DomainConnection};
use crate::entities::{reconstruct_entities, EntityInfo};
use crate::model::{EdgeType, GraphSnapshot, Node, NodeKind, NodeType, SourceLocation};
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Compact listing entry for one node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeSummary {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub name: String,
    /// The node's module path
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_location: Option<SourceLocation>,
}

/// An event handler subscribed to a published event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventSubscriber {
    pub id: String,
    pub name: String,
    pub domain: String,
}

/// An event published by the domain, with every subscriber in the snapshot
///
/// Subscribers are matched by event name, anywhere in the snapshot,
/// independent of whether any edge connects them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishedEvent {
    pub id: String,
    pub name: String,
    pub event_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_schema: Option<String>,
    pub subscribers: Vec<EventSubscriber>,
}

/// An event handler living in the domain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsumedEvent {
    pub id: String,
    pub name: String,
    pub subscribed_events: Vec<String>,
}

/// One deduplicated outgoing `(target domain, edge type)` pair
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrossDomainEdge {
    pub target_domain: String,
    pub edge_type: String,
}

/// Everything the presentation layer shows for one domain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainDetails {
    pub domain: String,
    pub description: String,
    pub system_type: String,
    /// One counter per node variant, in presentation-priority order
    pub node_counts: IndexMap<NodeType, usize>,
    /// In-domain nodes sorted by type priority
    pub nodes: Vec<NodeSummary>,
    pub published_events: Vec<PublishedEvent>,
    pub consumed_events: Vec<ConsumedEvent>,
    /// Deduplicated, sorted by target domain
    pub cross_domain_edges: Vec<CrossDomainEdge>,
    pub entities: Vec<EntityInfo>,
    pub connections: Vec<DomainConnection>,
}

fn summarize(node: &Node) -> NodeSummary {
    NodeSummary {
        id: node.id.clone(),
        node_type: node.node_type(),
        name: node.name.clone(),
        location: node.module.clone(),
        source_location: node.source_location.clone(),
    }
}

fn published_events(snapshot: &GraphSnapshot, domain_nodes: &[&Node]) -> Vec<PublishedEvent> {
    domain_nodes
        .iter()
        .filter_map(|node| {
            let NodeKind::Event {
                event_name,
                event_schema,
            } = &node.kind
            else {
                return None;
            };

            let subscribers = snapshot
                .nodes
                .iter()
                .filter_map(|candidate| match &candidate.kind {
                    NodeKind::EventHandler { subscribed_events }
                        if subscribed_events.contains(event_name) =>
                    {
                        Some(EventSubscriber {
                            id: candidate.id.clone(),
                            name: candidate.name.clone(),
                            domain: candidate.domain.clone(),
                        })
                    }
                    _ => None,
                })
                .collect();

            Some(PublishedEvent {
                id: node.id.clone(),
                name: node.name.clone(),
                event_name: event_name.clone(),
                event_schema: event_schema.clone(),
                subscribers,
            })
        })
        .collect()
}

fn consumed_events(domain_nodes: &[&Node]) -> Vec<ConsumedEvent> {
    domain_nodes
        .iter()
        .filter_map(|node| match &node.kind {
            NodeKind::EventHandler { subscribed_events } => Some(ConsumedEvent {
                id: node.id.clone(),
                name: node.name.clone(),
                subscribed_events: subscribed_events.clone(),
            }),
            _ => None,
        })
        .collect()
}

fn cross_domain_edges(snapshot: &GraphSnapshot, domain: &str) -> Vec<CrossDomainEdge> {
    let index = snapshot.node_index();
    let mut seen: IndexSet<CrossDomainEdge> = IndexSet::new();

    for edge in &snapshot.edges {
        let (Some(source), Some(target)) = (
            index.get(edge.source.as_str()),
            index.get(edge.target.as_str()),
        ) else {
            continue;
        };
        if source.domain != domain || target.domain == domain {
            continue;
        }
        seen.insert(CrossDomainEdge {
            target_domain: target.domain.clone(),
            edge_type: EdgeType::label(edge.edge_type).to_string(),
        });
    }

    let mut edges: Vec<CrossDomainEdge> = seen.into_iter().collect();
    // Stable: same-domain entries keep their first-encounter order.
    edges.sort_by(|a, b| a.target_domain.cmp(&b.target_domain));
    edges
}

/// Assemble the full detail view of one domain.
///
/// Returns `None` when `domain` has no entry in the snapshot's declared
/// domain table; implicit domains are aggregatable but not detailable.
pub fn domain_details(snapshot: &GraphSnapshot, domain: &str) -> Option<DomainDetails> {
    let metadata = snapshot.domains.get(domain)?;
    let domain_nodes = snapshot.nodes_in_domain(domain);

    let mut node_counts: IndexMap<NodeType, usize> = NodeType::PRIORITY_ORDER
        .iter()
        .map(|t| (*t, 0usize))
        .collect();
    for node in &domain_nodes {
        *node_counts.entry(node.node_type()).or_insert(0) += 1;
    }

    let mut nodes: Vec<NodeSummary> = domain_nodes.iter().map(|n| summarize(n)).collect();
    nodes.sort_by_key(|n| n.node_type.priority());

    let owned_nodes: Vec<Node> = domain_nodes.iter().map(|n| (*n).clone()).collect();
    let entities = reconstruct_entities(&owned_nodes);

    let details = DomainDetails {
        domain: domain.to_string(),
        description: metadata.description.clone(),
        system_type: metadata.system_type.clone(),
        node_counts,
        published_events: published_events(snapshot, &domain_nodes),
        consumed_events: consumed_events(&domain_nodes),
        cross_domain_edges: cross_domain_edges(snapshot, domain),
        entities,
        connections: aggregate_connections_for_domain(snapshot, domain),
        nodes,
    };

    debug!(
        domain = %details.domain,
        nodes = details.nodes.len(),
        entities = details.entities.len(),
        "assembled domain details"
    );
    Some(details)
}
