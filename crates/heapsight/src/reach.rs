//! Heap reachability analysis.
//!
//! Decides which heap objects are visible: everything reachable from the
//! innermost frame's reference-valued variables by any finite chain of
//! reference fields. The result is purely a display filter — hidden objects
//! are never deleted and stay inspectable on demand.

use std::collections::VecDeque;

use ahash::AHashSet;

use crate::{
    step::{Frame, HeapObject, Payload, object_index},
    value::{ObjectId, Value, is_reference},
};

/// Display partition of a step's objects.
///
/// Mirrors are synthetic display objects and always land in `visible`
/// regardless of reachability.
#[derive(Debug, Clone, PartialEq)]
pub struct ReachabilityReport {
    pub visible: Vec<HeapObject>,
    pub hidden: Vec<HeapObject>,
}

/// Computes the set of object ids reachable from the innermost frame.
///
/// Breadth-first with a shared visited set, so cyclic heaps (circular lists,
/// graphs) terminate. Dangling references are never expanded and never appear
/// in the result. Empty frames or an empty heap yield an empty set.
#[must_use]
pub fn reachable(frames: &[Frame], objects: &[HeapObject]) -> AHashSet<ObjectId> {
    let index = object_index(objects);
    let mut visited: AHashSet<ObjectId> = AHashSet::new();
    let mut queue: VecDeque<ObjectId> = VecDeque::new();

    if let Some(frame) = frames.last() {
        for value in frame.variables.values() {
            if let Value::Ref(id) = value {
                enqueue(id, &mut visited, &mut queue);
            }
        }
    }

    while let Some(id) = queue.pop_front() {
        let Some(object) = index.get(id.as_str()) else {
            continue;
        };
        match &object.payload {
            Payload::Sequence(items) => {
                for item in items {
                    enqueue_refs(item, &mut visited, &mut queue);
                }
            }
            Payload::Mapping(fields) => {
                for (key, value) in fields {
                    // Keys are only dereferenced when the key string itself
                    // is reference-shaped.
                    if is_reference(key) {
                        enqueue(&ObjectId::new(key.clone()), &mut visited, &mut queue);
                    }
                    enqueue_refs(value, &mut visited, &mut queue);
                }
            }
            Payload::Scalar(value) => enqueue_refs(value, &mut visited, &mut queue),
        }
    }

    // Dangling ids were queued for traversal bookkeeping but are not part of
    // the reachable set.
    visited.retain(|id| index.contains_key(id.as_str()));
    visited
}

/// Partitions objects into visible and hidden for the generic heap view.
#[must_use]
pub fn partition(objects: &[HeapObject], reachable: &AHashSet<ObjectId>) -> ReachabilityReport {
    let mut visible = Vec::new();
    let mut hidden = Vec::new();
    for object in objects {
        if object.is_mirror() || reachable.contains(&object.id) {
            visible.push(object.clone());
        } else {
            hidden.push(object.clone());
        }
    }
    ReachabilityReport { visible, hidden }
}

fn enqueue(id: &ObjectId, visited: &mut AHashSet<ObjectId>, queue: &mut VecDeque<ObjectId>) {
    if visited.insert(id.clone()) {
        queue.push_back(id.clone());
    }
}

/// Enqueues a value's references, looking one level into inline sequences so
/// adjacency lists stored directly in attributes are followed.
fn enqueue_refs(value: &Value, visited: &mut AHashSet<ObjectId>, queue: &mut VecDeque<ObjectId>) {
    match value {
        Value::Ref(id) => enqueue(id, visited, queue),
        Value::Seq(items) => {
            for item in items {
                if let Value::Ref(id) = item {
                    enqueue(id, visited, queue);
                }
            }
        }
        _ => {}
    }
}
