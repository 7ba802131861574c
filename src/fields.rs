//! Node field extraction
//!
//! Maps a tracked field name to a node's canonical value, or `None` when the
//! field does not apply to the node's variant. This is the diff engine's sole
//! equality oracle: to track a new field, add it to [`TRACKED_FIELDS`] and
//! give it an arm in [`field_value`] — nothing in the diff algorithm changes.

use crate::model::{Node, NodeKind};
use serde::Serialize;
use serde_json::Value;

/// Every field the diff engine compares, common fields first, then each
/// variant's own fields.
pub const TRACKED_FIELDS: [&str; 20] = [
    "id",
    "name",
    "domain",
    "module",
    "description",
    "sourceLocation",
    "metadata",
    "route",
    "apiType",
    "httpMethod",
    "path",
    "operationName",
    "entity",
    "signature",
    "behavior",
    "stateChanges",
    "eventName",
    "eventSchema",
    "subscribedEvents",
    "customTypeName",
];

fn canonical<T: Serialize>(value: &T) -> Option<Value> {
    serde_json::to_value(value).ok()
}

/// Canonical value of `field` on `node`, or `None` when the field is not
/// applicable to the node's variant or is unset.
///
/// Equality of the returned values is structural: nested shapes like
/// `signature` and `behavior` compare field by field, with key order fixed by
/// the type definitions.
pub fn field_value(node: &Node, field: &str) -> Option<Value> {
    match field {
        "id" => Some(Value::String(node.id.clone())),
        "name" => Some(Value::String(node.name.clone())),
        "domain" => Some(Value::String(node.domain.clone())),
        "module" => Some(Value::String(node.module.clone())),
        "description" => node.description.clone().map(Value::String),
        "sourceLocation" => node.source_location.as_ref().and_then(canonical),
        "metadata" => node.metadata.clone(),
        "route" => match &node.kind {
            NodeKind::Ui { route } => Some(Value::String(route.clone())),
            _ => None,
        },
        "apiType" => match &node.kind {
            NodeKind::Api { api_type, .. } => Some(Value::String(api_type.clone())),
            _ => None,
        },
        "httpMethod" => match &node.kind {
            NodeKind::Api { http_method, .. } => http_method.clone().map(Value::String),
            _ => None,
        },
        "path" => match &node.kind {
            NodeKind::Api { path, .. } => path.clone().map(Value::String),
            _ => None,
        },
        "operationName" => match &node.kind {
            NodeKind::DomainOp { operation_name, .. } => {
                Some(Value::String(operation_name.clone()))
            }
            _ => None,
        },
        "entity" => match &node.kind {
            NodeKind::DomainOp { entity, .. } => entity.clone().map(Value::String),
            _ => None,
        },
        "signature" => match &node.kind {
            NodeKind::DomainOp { signature, .. } => signature.as_ref().and_then(canonical),
            _ => None,
        },
        "behavior" => match &node.kind {
            NodeKind::DomainOp { behavior, .. } => behavior.as_ref().and_then(canonical),
            _ => None,
        },
        "stateChanges" => match &node.kind {
            NodeKind::DomainOp { state_changes, .. } if !state_changes.is_empty() => {
                canonical(state_changes)
            }
            _ => None,
        },
        "eventName" => match &node.kind {
            NodeKind::Event { event_name, .. } => Some(Value::String(event_name.clone())),
            _ => None,
        },
        "eventSchema" => match &node.kind {
            NodeKind::Event { event_schema, .. } => event_schema.clone().map(Value::String),
            _ => None,
        },
        "subscribedEvents" => match &node.kind {
            NodeKind::EventHandler { subscribed_events } => canonical(subscribed_events),
            _ => None,
        },
        "customTypeName" => match &node.kind {
            NodeKind::Custom { custom_type_name } => {
                Some(Value::String(custom_type_name.clone()))
            }
            _ => None,
        },
        _ => None,
    }
}

/// Names of tracked fields whose values differ between two nodes, in catalog
/// order. Empty when the nodes are equal on every tracked field.
pub fn changed_fields(before: &Node, after: &Node) -> Vec<String> {
    TRACKED_FIELDS
        .iter()
        .filter(|field| field_value(before, field) != field_value(after, field))
        .map(|field| field.to_string())
        .collect()
}
