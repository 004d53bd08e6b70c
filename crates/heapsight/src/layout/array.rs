//! Sequential cell layout for array-shaped roots.

use crate::{
    render::{ArrayCell, ArrayLayout},
    step::{HeapObject, Payload},
    value::ObjectId,
};

/// Renders the root's ordered payload as adjacent equal-size cells with an
/// index under each. An empty or non-sequence payload renders as a single
/// placeholder cell; a dangling root returns `None` and the router falls
/// back to the generic view. O(N).
#[must_use]
pub fn build(objects: &[HeapObject], root: &ObjectId) -> Option<ArrayLayout> {
    let object = objects.iter().find(|object| &object.id == root)?;
    let cells = match &object.payload {
        Payload::Sequence(items) if !items.is_empty() => items
            .iter()
            .enumerate()
            .map(|(index, value)| ArrayCell {
                index,
                value: Some(value.clone()),
            })
            .collect(),
        _ => vec![ArrayCell { index: 0, value: None }],
    };
    Some(ArrayLayout { cells })
}
