//! Architecture graph nodes
//!
//! Nodes are immutable value objects compared by value. The common fields are
//! shared by every component; the variant-specific shape lives in [`NodeKind`],
//! tagged by the `type` field on the wire.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a node or edge was discovered in source code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceLocation {
    /// Repository the artifact lives in
    pub repository: String,
    /// Path of the file within the repository
    pub file_path: String,
    /// Line number, when the extractor recorded one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
}

/// A single parameter of a domain operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "type")]
    pub param_type: String,
}

/// Parameter list and return type of a domain operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Signature {
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub returns: Option<String>,
}

/// What a domain operation reads, validates, modifies and emits
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Behavior {
    #[serde(default)]
    pub reads: Vec<String>,
    #[serde(default)]
    pub validates: Vec<String>,
    #[serde(default)]
    pub modifies: Vec<String>,
    #[serde(default)]
    pub emits: Vec<String>,
}

/// One state transition recorded on a domain operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateChange {
    pub from: String,
    pub to: String,
}

impl StateChange {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// Variant-specific shape of a node, tagged by `type`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum NodeKind {
    /// A user-interface surface
    #[serde(rename = "UI", rename_all = "camelCase")]
    Ui { route: String },
    /// An exposed API endpoint
    #[serde(rename = "API", rename_all = "camelCase")]
    Api {
        api_type: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        http_method: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        path: Option<String>,
    },
    /// An application use case
    UseCase,
    /// A domain operation, optionally attached to an entity
    #[serde(rename_all = "camelCase")]
    DomainOp {
        operation_name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        entity: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        signature: Option<Signature>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        behavior: Option<Behavior>,
        #[serde(default)]
        state_changes: Vec<StateChange>,
    },
    /// A published domain event
    #[serde(rename_all = "camelCase")]
    Event {
        event_name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        event_schema: Option<String>,
    },
    /// A subscriber reacting to domain events
    #[serde(rename_all = "camelCase")]
    EventHandler { subscribed_events: Vec<String> },
    /// A component outside the fixed catalog
    #[serde(rename_all = "camelCase")]
    Custom { custom_type_name: String },
}

/// Discriminant of [`NodeKind`], used for grouping and display ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeType {
    #[serde(rename = "UI")]
    Ui,
    #[serde(rename = "API")]
    Api,
    UseCase,
    DomainOp,
    Event,
    EventHandler,
    Custom,
}

impl NodeType {
    /// Every node type, in presentation-priority order
    pub const PRIORITY_ORDER: [NodeType; 7] = [
        NodeType::Ui,
        NodeType::Api,
        NodeType::UseCase,
        NodeType::DomainOp,
        NodeType::Event,
        NodeType::EventHandler,
        NodeType::Custom,
    ];

    /// Get the string representation of the node type
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Ui => "UI",
            NodeType::Api => "API",
            NodeType::UseCase => "UseCase",
            NodeType::DomainOp => "DomainOp",
            NodeType::Event => "Event",
            NodeType::EventHandler => "EventHandler",
            NodeType::Custom => "Custom",
        }
    }

    /// Rank of this type within [`Self::PRIORITY_ORDER`]
    pub fn priority(&self) -> usize {
        Self::PRIORITY_ORDER
            .iter()
            .position(|t| t == self)
            .unwrap_or(Self::PRIORITY_ORDER.len())
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One component of the architecture graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// Unique identifier within a snapshot
    pub id: String,
    /// Human-readable name
    pub name: String,
    /// Domain the node belongs to
    pub domain: String,
    /// Module path within the domain
    pub module: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_location: Option<SourceLocation>,
    /// Free-form extractor metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
    #[serde(flatten)]
    pub kind: NodeKind,
}

impl Node {
    /// The discriminant of this node's variant
    pub fn node_type(&self) -> NodeType {
        match self.kind {
            NodeKind::Ui { .. } => NodeType::Ui,
            NodeKind::Api { .. } => NodeType::Api,
            NodeKind::UseCase => NodeType::UseCase,
            NodeKind::DomainOp { .. } => NodeType::DomainOp,
            NodeKind::Event { .. } => NodeType::Event,
            NodeKind::EventHandler { .. } => NodeType::EventHandler,
            NodeKind::Custom { .. } => NodeType::Custom,
        }
    }
}
