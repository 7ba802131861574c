//! Shared data shapes of the architecture graph
//!
//! Plain value objects consumed by every other module: node variants, edges,
//! snapshots and domain metadata. No behavior beyond construction helpers and
//! lookups.

mod edge;
mod node;
mod snapshot;

pub use edge::{Edge, EdgeType};
pub use node::{
    Behavior, Node, NodeKind, NodeType, Parameter, Signature, SourceLocation, StateChange,
};
pub use snapshot::{DomainMetadata, GraphSnapshot};
