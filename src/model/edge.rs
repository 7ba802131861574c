//! Architecture graph edges
//!
//! A directed link between two nodes, identified by its endpoint pair. Edges
//! carry no id of their own: for diffing and aggregation, two edges with the
//! same `(source, target)` pair are the same edge.

use crate::model::SourceLocation;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Interaction style of a link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeType {
    Sync,
    Async,
}

impl EdgeType {
    /// Get the string representation of the edge type
    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeType::Sync => "sync",
            EdgeType::Async => "async",
        }
    }

    /// Label for an optional edge type; absent types read as "unknown"
    pub fn label(edge_type: Option<EdgeType>) -> &'static str {
        edge_type.map(|t| t.as_str()).unwrap_or("unknown")
    }
}

impl fmt::Display for EdgeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A directed link between two nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    /// Id of the source node
    pub source: String,
    /// Id of the target node
    pub target: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub edge_type: Option<EdgeType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_location: Option<SourceLocation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

impl Edge {
    /// Create a plain edge with no type or attachments
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            edge_type: None,
            payload: None,
            source_location: None,
            metadata: None,
        }
    }

    /// The `(source, target)` pair that identifies this edge
    pub fn endpoint_key(&self) -> (String, String) {
        (self.source.clone(), self.target.clone())
    }
}
