//! Graph snapshots
//!
//! One immutable version of the architecture graph: nodes, edges and the
//! declared-domain table. Snapshots arrive already validated by the upstream
//! parser; everything in this crate reads them and returns fresh values.

use crate::model::{Edge, Node};
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Declared metadata for a domain
///
/// Domains referenced only by node `domain` fields are still valid for
/// aggregation; they just have no entry here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainMetadata {
    pub description: String,
    pub system_type: String,
}

/// One immutable version of the architecture graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphSnapshot {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    /// Declared domains, in declaration order
    #[serde(default)]
    pub domains: IndexMap<String, DomainMetadata>,
}

impl GraphSnapshot {
    /// Create an empty snapshot
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            domains: IndexMap::new(),
        }
    }

    /// Index nodes by id for O(1) endpoint resolution
    pub fn node_index(&self) -> HashMap<&str, &Node> {
        self.nodes.iter().map(|n| (n.id.as_str(), n)).collect()
    }

    /// Union of every node's `domain` value, in first-observed order
    ///
    /// Not restricted to the declared-domain table.
    pub fn domain_names(&self) -> Vec<String> {
        let mut seen: IndexSet<&str> = IndexSet::new();
        for node in &self.nodes {
            seen.insert(node.domain.as_str());
        }
        seen.into_iter().map(|d| d.to_string()).collect()
    }

    /// Nodes belonging to one domain, in snapshot order
    pub fn nodes_in_domain<'a>(&'a self, domain: &str) -> Vec<&'a Node> {
        self.nodes.iter().filter(|n| n.domain == domain).collect()
    }
}

impl Default for GraphSnapshot {
    fn default() -> Self {
        Self::new()
    }
}
