//! Shape classification of the referenced heap.
//!
//! Candidates are the distinct references held by the innermost frame, in
//! variable order. Each shape heuristic runs over every candidate before the
//! next heuristic is tried, so an array candidate anywhere beats a tree
//! candidate anywhere. The ordering is deliberate: array and tree are the
//! least ambiguous (explicit type tags, verifiable acyclicity), a linked
//! chain is a strict subset of "pointer-shaped" and must be claimed before
//! the permissive graph heuristic, and generic is the catch-all.
//!
//! Field names are duck-typed against small constant alias tables rather
//! than any reflective lookup; tracers in the wild use `left`/`pLeft`/
//! `leftPtr` interchangeably and the tables absorb that.

use ahash::{AHashMap, AHashSet};
use indexmap::IndexMap;

use crate::{
    step::{Frame, HeapObject, Payload, object_index},
    value::{ObjectId, Value},
};

pub(crate) const LEFT_ALIASES: &[&str] = &["left", "leftPtr", "pLeft"];
pub(crate) const RIGHT_ALIASES: &[&str] = &["right", "rightPtr", "pRight"];
pub(crate) const NEXT_ALIASES: &[&str] = &["next", "nxt", "link", "ptr", "forward", "pNext", "_next"];
pub(crate) const GRAPH_FIELDS: &[&str] = &["neighbors", "adj", "children", "adjList", "edges", "links"];

/// Field name carrying an n-ary tree's child references.
pub(crate) const CHILDREN_FIELD: &str = "children";

/// Detected shape of the heap structure referenced by the active frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum Shape {
    Array,
    Tree,
    LinkedList,
    Graph,
    Generic,
}

/// Classification result: the winning shape and the candidate root that
/// matched it. `Generic` carries no root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub shape: Shape,
    pub root: Option<ObjectId>,
}

/// Classifies the heap referenced by the innermost frame.
///
/// Deterministic for a fixed input: candidate order is frame variable order
/// with first-discovered tie-breaking, and the heuristics themselves use no
/// randomness.
#[must_use]
pub fn classify(objects: &[HeapObject], frames: &[Frame]) -> Classification {
    let candidates = candidate_roots(frames);
    let index = object_index(objects);

    type Check = fn(&HeapObject, &AHashMap<&str, &HeapObject>) -> bool;
    let priorities: [(Shape, Check); 4] = [
        (Shape::Array, is_array_shaped),
        (Shape::Tree, is_tree_shaped),
        (Shape::LinkedList, is_list_shaped),
        (Shape::Graph, is_graph_shaped),
    ];

    for (shape, check) in priorities {
        for id in &candidates {
            if let Some(object) = index.get(id.as_str())
                && check(object, &index)
            {
                return Classification {
                    shape,
                    root: Some(id.clone()),
                };
            }
        }
    }
    Classification {
        shape: Shape::Generic,
        root: None,
    }
}

/// Distinct references held by the innermost frame, in discovery order.
fn candidate_roots(frames: &[Frame]) -> Vec<ObjectId> {
    let mut seen = AHashSet::new();
    let mut roots = Vec::new();
    if let Some(frame) = frames.last() {
        for value in frame.variables.values() {
            if let Value::Ref(id) = value
                && seen.insert(id.clone())
            {
                roots.push(id.clone());
            }
        }
    }
    roots
}

/// Looks up the first alias present in a mapping payload.
pub(crate) fn lookup_alias<'a>(fields: &'a IndexMap<String, Value>, aliases: &[&str]) -> Option<&'a Value> {
    aliases.iter().find_map(|name| fields.get(*name))
}

fn has_alias(fields: &IndexMap<String, Value>, aliases: &[&str]) -> bool {
    lookup_alias(fields, aliases).is_some()
}

/// Array: an explicit sequence type tag, or a literal ordered payload. No
/// traversal needed.
fn is_array_shaped(object: &HeapObject, _index: &AHashMap<&str, &HeapObject>) -> bool {
    object.kind.is_sequence() || matches!(object.payload, Payload::Sequence(_))
}

/// Tree: at least one binary pointer alias, and a depth-first walk over
/// left/right children that never revisits a node. The visited set is shared
/// across the whole walk, so DAG reconvergence also fails this heuristic —
/// a true tree is strictly acyclic.
fn is_tree_shaped(object: &HeapObject, index: &AHashMap<&str, &HeapObject>) -> bool {
    let Payload::Mapping(fields) = &object.payload else {
        return false;
    };
    if !has_alias(fields, LEFT_ALIASES) && !has_alias(fields, RIGHT_ALIASES) {
        return false;
    }

    let mut visited: AHashSet<ObjectId> = AHashSet::new();
    let mut stack = vec![object.id.clone()];
    while let Some(id) = stack.pop() {
        if !visited.insert(id.clone()) {
            return false;
        }
        let Some(node) = index.get(id.as_str()) else {
            // Dangling child: ignored, not a failure.
            continue;
        };
        if let Payload::Mapping(node_fields) = &node.payload {
            for aliases in [LEFT_ALIASES, RIGHT_ALIASES] {
                if let Some(Value::Ref(child)) = lookup_alias(node_fields, aliases) {
                    stack.push(child.clone());
                }
            }
        }
    }
    true
}

/// Linked list: exactly a forward pointer, no tree pointers (tree nodes with
/// an incidental `next` field must not be claimed here). The forward walk
/// treats a repeated id as a valid circular terminus, never a failure.
fn is_list_shaped(object: &HeapObject, index: &AHashMap<&str, &HeapObject>) -> bool {
    let Payload::Mapping(fields) = &object.payload else {
        return false;
    };
    if !has_alias(fields, NEXT_ALIASES) {
        return false;
    }
    if has_alias(fields, LEFT_ALIASES) || has_alias(fields, RIGHT_ALIASES) {
        return false;
    }

    let mut visited: AHashSet<ObjectId> = AHashSet::new();
    let mut current = object.id.clone();
    loop {
        if !visited.insert(current.clone()) {
            // Circular list: still a list.
            return true;
        }
        let Some(node) = index.get(current.as_str()) else {
            return true;
        };
        let Payload::Mapping(node_fields) = &node.payload else {
            return true;
        };
        match lookup_alias(node_fields, NEXT_ALIASES) {
            Some(Value::Ref(next)) => current = next.clone(),
            // Null marker or any non-reference ends the chain.
            _ => return true,
        }
    }
}

/// Graph: an adjacency-list-shaped mapping (values that are sequences of
/// references) or any explicit graph field name. Intentionally permissive —
/// the union of "failed every earlier test but looks pointer-shaped".
fn is_graph_shaped(object: &HeapObject, _index: &AHashMap<&str, &HeapObject>) -> bool {
    let Payload::Mapping(fields) = &object.payload else {
        return false;
    };
    if has_alias(fields, GRAPH_FIELDS) {
        return true;
    }
    fields.values().any(|value| {
        matches!(value, Value::Seq(items)
            if !items.is_empty() && items.iter().all(|item| item.as_ref_id().is_some()))
    })
}
