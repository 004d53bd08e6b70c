//! Layout builders, one per detected shape.
//!
//! Every builder consumes `(objects, root)` read-only and produces a
//! [`RenderModel`](crate::RenderModel) component, or `None` when the shape
//! cannot be built (dangling root, no qualifying nodes) so the router can
//! fall back to the generic view.

pub mod array;
pub mod graph;
pub mod list;
pub mod tree;

use crate::{
    classify::{GRAPH_FIELDS, LEFT_ALIASES, NEXT_ALIASES, RIGHT_ALIASES},
    step::{HeapObject, Payload},
    value::Value,
};

/// Horizontal spacing between chain-walk nodes.
pub(crate) const NODE_SPACING: f64 = 120.0;
/// Origin of the linked-list chain walk.
pub(crate) const LIST_ORIGIN: (f64, f64) = (60.0, 120.0);

/// Picks the displayed data of a node: the first payload field that is not a
/// structural pointer, falling back to the object id.
pub(crate) fn display_value(object: &HeapObject) -> Value {
    match &object.payload {
        Payload::Scalar(value) => value.clone(),
        Payload::Sequence(items) => Value::Seq(items.clone()),
        Payload::Mapping(fields) => fields
            .iter()
            .find(|(name, _)| !is_pointer_field(name))
            .map_or_else(
                || Value::Str(object.id.to_string()),
                |(_, value)| value.clone(),
            ),
    }
}

/// [`display_value`] rendered as text, for tree node names.
pub(crate) fn display_label(object: &HeapObject) -> String {
    display_value(object).to_string()
}

fn is_pointer_field(name: &str) -> bool {
    [LEFT_ALIASES, RIGHT_ALIASES, NEXT_ALIASES, GRAPH_FIELDS]
        .iter()
        .any(|aliases| aliases.contains(&name))
}
