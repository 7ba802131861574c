//! Architecture graph analysis
//!
//! The analytical core behind architecture-graph exploration: structural
//! diffing of two graph snapshots, aggregation of node-level cross-domain
//! links into domain-pair summaries, reconstruction of entity state machines
//! from unordered transition records, and per-domain detail assembly.
//!
//! Every operation is synchronous and pure: snapshots go in, freshly built
//! values come out, nothing is mutated or cached. Callers that need
//! responsiveness on very large graphs can offload calls to a worker as-is.

pub mod connections;
pub mod details;
pub mod diff;
pub mod entities;
pub mod fields;
pub mod model;

// Re-export the data model
pub use model::{
    Behavior, DomainMetadata, Edge, EdgeType, GraphSnapshot, Node, NodeKind, NodeType, Parameter,
    Signature, SourceLocation, StateChange,
};

// Re-export the diff engine
pub use diff::{
    diff_graphs, DiffStats, EdgeDiff, GraphDiff, ModifiedEdge, ModifiedNode, NodeDiff,
};

// Re-export the connection aggregator
pub use connections::{
    aggregate_connections, aggregate_connections_for_domain, diff_connections, ConnectionDetail,
    DomainConnection, DomainConnectionAggregation, DomainConnectionDiffResult,
};

// Re-export entity reconstruction
pub use entities::{reconstruct_entities, EntityInfo, OperationDetail};

// Re-export the details assembler
pub use details::{
    domain_details, ConsumedEvent, CrossDomainEdge, DomainDetails, EventSubscriber, NodeSummary,
    PublishedEvent,
};

// Re-export the field extractor
pub use fields::{changed_fields, field_value, TRACKED_FIELDS};
