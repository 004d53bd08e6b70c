//! Recursive tree structure layout.
//!
//! The visited set is cloned per branch rather than shared: an object
//! reachable via two different branches (a shared subtree, i.e. DAG
//! reconvergence) renders twice, while a branch revisiting its own ancestor
//! renders a terminal `Cycle` leaf instead of recursing forever. This is
//! deliberately looser than the classifier's strictly acyclic walk — global
//! memoization would collapse legitimate sharing into one rendered node.

use ahash::{AHashMap, AHashSet};

use crate::{
    classify::{CHILDREN_FIELD, LEFT_ALIASES, RIGHT_ALIASES, lookup_alias},
    layout::display_label,
    render::{TreeLayout, TreeNode},
    step::{HeapObject, Payload, object_index},
    value::{ObjectId, Value},
};

/// Builds the recursive structure, or `None` when the root is dangling.
#[must_use]
pub fn build(objects: &[HeapObject], root: &ObjectId) -> Option<TreeLayout> {
    let index = object_index(objects);
    if !index.contains_key(root.as_str()) {
        return None;
    }
    Some(TreeLayout {
        root: build_node(root, &index, &AHashSet::new()),
    })
}

fn build_node(id: &ObjectId, index: &AHashMap<&str, &HeapObject>, ancestors: &AHashSet<ObjectId>) -> TreeNode {
    if ancestors.contains(id) {
        return TreeNode {
            name: "Cycle".to_owned(),
            id: Some(id.clone()),
            children: Vec::new(),
        };
    }
    let Some(object) = index.get(id.as_str()) else {
        return TreeNode {
            name: "missing".to_owned(),
            id: None,
            children: Vec::new(),
        };
    };

    // Per-branch clone: sibling branches never see each other's visits.
    let mut path = ancestors.clone();
    path.insert(id.clone());

    let mut children = Vec::new();
    if let Payload::Mapping(fields) = &object.payload {
        if let Some(Value::Seq(items)) = fields.get(CHILDREN_FIELD) {
            // N-ary node: a `children` array of references replaces left/right.
            for item in items {
                if let Value::Ref(child) = item {
                    children.push(build_node(child, index, &path));
                }
            }
        } else {
            for aliases in [LEFT_ALIASES, RIGHT_ALIASES] {
                if let Some(Value::Ref(child)) = lookup_alias(fields, aliases) {
                    children.push(build_node(child, index, &path));
                }
            }
        }
    }

    TreeNode {
        name: display_label(object),
        id: Some(id.clone()),
        children,
    }
}
