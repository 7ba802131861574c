//! Entity state reconstruction
//!
//! Groups domain operations by the entity they act on and rebuilds each
//! entity's state sequence from the unordered `{from, to}` transition records
//! scattered across its operations. The walk is iterative with an explicit
//! visited set, so cyclic and disconnected transition graphs terminate and
//! produce a deterministic order.

use crate::model::{Behavior, Node, NodeKind, Signature, SourceLocation, StateChange};
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

/// One domain operation attached to an entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationDetail {
    pub id: String,
    pub operation_name: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub behavior: Option<Behavior>,
    #[serde(default)]
    pub state_changes: Vec<StateChange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<Signature>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_location: Option<SourceLocation>,
}

/// A business entity inferred from a group of domain operations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityInfo {
    pub name: String,
    /// Deduplicated operation names, alphabetical
    pub operations: Vec<String>,
    /// Full operation records, alphabetical by operation name
    pub operation_details: Vec<OperationDetail>,
    /// Every state mentioned by any operation, in reconstructed order
    pub states: Vec<String>,
    /// First location recorded on any of the entity's operations
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_location: Option<SourceLocation>,
}

#[derive(Default)]
struct EntityAccumulator {
    operations: IndexSet<String>,
    details: Vec<OperationDetail>,
    state_names: IndexSet<String>,
    transitions: IndexMap<String, String>,
    source_location: Option<SourceLocation>,
}

/// Order an entity's states from its transition map.
///
/// Initial states (a `from` that is never a `to`) seed chain walks through the
/// map; each walk stops the moment it would revisit a state already emitted.
/// States no walk reaches — isolated states, cycles with no entry point,
/// disconnected subgraphs — are appended in first-encounter order.
fn order_states(state_names: &IndexSet<String>, transitions: &IndexMap<String, String>) -> Vec<String> {
    let initial: Vec<&String> = transitions
        .keys()
        .filter(|from| !transitions.values().any(|to| to == *from))
        .collect();

    let mut visited: HashSet<&str> = HashSet::new();
    let mut ordered: Vec<String> = Vec::new();

    for start in initial {
        let mut current = start;
        while visited.insert(current.as_str()) {
            ordered.push(current.clone());
            match transitions.get(current) {
                Some(next) => current = next,
                None => break,
            }
        }
    }

    for state in state_names {
        if !visited.contains(state.as_str()) {
            ordered.push(state.clone());
        }
    }

    ordered
}

/// Group domain-operation nodes into entities and reconstruct each entity's
/// state sequence.
///
/// Only `DomainOp` nodes carrying an `entity` participate; every other node
/// is ignored. When several operations declare a transition out of the same
/// state, the last one processed wins.
pub fn reconstruct_entities(nodes: &[Node]) -> Vec<EntityInfo> {
    let mut groups: IndexMap<String, EntityAccumulator> = IndexMap::new();

    for node in nodes {
        let NodeKind::DomainOp {
            operation_name,
            entity: Some(entity),
            signature,
            behavior,
            state_changes,
        } = &node.kind
        else {
            continue;
        };

        let acc = groups.entry(entity.clone()).or_default();
        acc.operations.insert(operation_name.clone());
        acc.details.push(OperationDetail {
            id: node.id.clone(),
            operation_name: operation_name.clone(),
            name: node.name.clone(),
            behavior: behavior.clone(),
            state_changes: state_changes.clone(),
            signature: signature.clone(),
            source_location: node.source_location.clone(),
        });
        for change in state_changes {
            acc.state_names.insert(change.from.clone());
            acc.state_names.insert(change.to.clone());
            acc.transitions.insert(change.from.clone(), change.to.clone());
        }
        if acc.source_location.is_none() {
            acc.source_location = node.source_location.clone();
        }
    }

    let mut entities: Vec<EntityInfo> = groups
        .into_iter()
        .map(|(name, acc)| {
            let states = order_states(&acc.state_names, &acc.transitions);
            let mut operations: Vec<String> = acc.operations.into_iter().collect();
            operations.sort();
            let mut operation_details = acc.details;
            operation_details.sort_by(|a, b| a.operation_name.cmp(&b.operation_name));
            EntityInfo {
                name,
                operations,
                operation_details,
                states,
                source_location: acc.source_location,
            }
        })
        .collect();
    entities.sort_by(|a, b| a.name.cmp(&b.name));

    debug!(entities = entities.len(), "reconstructed entity state machines");
    entities
}
