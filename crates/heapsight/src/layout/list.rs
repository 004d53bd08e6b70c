//! Linked-list chain layout.
//!
//! Walks forward from the root along the forward-pointer alias, placing
//! nodes left to right at fixed spacing. A revisited node ends the walk with
//! a single curved back-edge to its first occurrence; a null or
//! non-reference terminus appends a terminal `NULL` sentinel; a dangling
//! pointer appends a `missing` marker. Each walked node is annotated with
//! every innermost-frame variable name aliasing it.

use ahash::AHashMap;

use crate::{
    classify::{NEXT_ALIASES, lookup_alias},
    layout::{LIST_ORIGIN, NODE_SPACING, display_value},
    render::{ListEdge, ListLayout, ListNode},
    step::{Frame, HeapObject, Payload, object_index},
    value::{ObjectId, Value},
};

/// Builds the chain layout, or `None` when the root itself is dangling.
/// O(N) in chain length plus O(V) per node in frame variable count.
#[must_use]
pub fn build(objects: &[HeapObject], root: &ObjectId, frames: &[Frame]) -> Option<ListLayout> {
    let index = object_index(objects);
    if !index.contains_key(root.as_str()) {
        return None;
    }
    let frame = frames.last();

    let mut nodes: Vec<ListNode> = Vec::new();
    let mut edges: Vec<ListEdge> = Vec::new();
    let mut seen: AHashMap<ObjectId, usize> = AHashMap::new();
    let mut current = Some(root.clone());

    while let Some(id) = current.take() {
        if let Some(&first) = seen.get(&id) {
            // Cycle terminus: one back-edge to the first occurrence, stop.
            if let Some(last) = nodes.len().checked_sub(1) {
                edges.push(ListEdge {
                    from: last,
                    to: first,
                    is_cycle: true,
                });
            }
            break;
        }

        let Some(object) = index.get(id.as_str()) else {
            push_sentinel(&mut nodes, &mut edges, "missing");
            break;
        };

        let position = nodes.len();
        seen.insert(id.clone(), position);
        nodes.push(ListNode {
            id: Some(id.clone()),
            value: display_value(object),
            x: LIST_ORIGIN.0 + spacing(position),
            y: LIST_ORIGIN.1,
            pointer_labels: pointer_labels(frame, &id),
        });
        if position > 0 {
            edges.push(ListEdge {
                from: position - 1,
                to: position,
                is_cycle: false,
            });
        }

        let next = match &object.payload {
            Payload::Mapping(fields) => lookup_alias(fields, NEXT_ALIASES),
            _ => None,
        };
        match next {
            Some(Value::Ref(next_id)) => current = Some(next_id.clone()),
            _ => {
                push_sentinel(&mut nodes, &mut edges, "NULL");
                break;
            }
        }
    }

    Some(ListLayout { nodes, edges })
}

/// Every innermost-frame variable name whose value aliases this node.
fn pointer_labels(frame: Option<&Frame>, id: &ObjectId) -> Vec<String> {
    let Some(frame) = frame else {
        return Vec::new();
    };
    frame
        .variables
        .iter()
        .filter(|(_, value)| matches!(value, Value::Ref(target) if target == id))
        .map(|(name, _)| name.clone())
        .collect()
}

fn push_sentinel(nodes: &mut Vec<ListNode>, edges: &mut Vec<ListEdge>, marker: &str) {
    let position = nodes.len();
    nodes.push(ListNode {
        id: None,
        value: Value::Str(marker.to_owned()),
        x: LIST_ORIGIN.0 + spacing(position),
        y: LIST_ORIGIN.1,
        pointer_labels: Vec::new(),
    });
    if position > 0 {
        edges.push(ListEdge {
            from: position - 1,
            to: position,
            is_cycle: false,
        });
    }
}

fn spacing(position: usize) -> f64 {
    position as f64 * NODE_SPACING
}
