//! Tests for the array and linked-list layout builders.

use heapsight::{
    Frame, HeapObject, ObjectId, ObjectKind, Payload, Value,
    layout::{array, list},
};
use indexmap::indexmap;

fn instance(id: &str, fields: indexmap::IndexMap<String, Value>) -> HeapObject {
    HeapObject::new(id, ObjectKind::Instance, Payload::Mapping(fields))
}

fn main_frame(vars: indexmap::IndexMap<String, Value>) -> Vec<Frame> {
    vec![Frame {
        name: "main".to_owned(),
        variables: vars,
    }]
}

fn r(id: &str) -> Value {
    Value::Ref(ObjectId::from(id))
}

// =============================================================================
// 1. Array layout
// =============================================================================

/// `{type:"list", value:[1,2,3]}` renders three cells in original order with
/// their indices.
#[test]
fn array_renders_cells_in_order() {
    let objects = vec![HeapObject::new(
        "obj1",
        ObjectKind::List,
        Payload::Sequence(vec![Value::Int(1), Value::Int(2), Value::Int(3)]),
    )];
    let layout = array::build(&objects, &ObjectId::from("obj1")).unwrap();
    assert_eq!(layout.cells.len(), 3);
    for (i, cell) in layout.cells.iter().enumerate() {
        assert_eq!(cell.index, i);
        assert_eq!(cell.value, Some(Value::Int(i as i64 + 1)));
    }
}

// =============================================================================
// 2. Linked-list chain walk
// =============================================================================

/// A two-node chain produces two data nodes, a NULL sentinel, and two
/// forward edges, placed left to right.
#[test]
fn chain_walk_appends_null_sentinel() {
    let objects = vec![
        instance("obj1", indexmap! { "val".to_owned() => Value::Int(5), "next".to_owned() => r("obj2") }),
        instance("obj2", indexmap! { "val".to_owned() => Value::Int(10), "next".to_owned() => Value::None }),
    ];
    let frames = main_frame(indexmap! { "head".to_owned() => r("obj1") });
    let layout = list::build(&objects, &ObjectId::from("obj1"), &frames).unwrap();

    assert_eq!(layout.nodes.len(), 3, "two data nodes plus the NULL sentinel");
    assert_eq!(layout.nodes[0].id, Some(ObjectId::from("obj1")));
    assert_eq!(layout.nodes[1].id, Some(ObjectId::from("obj2")));
    assert_eq!(layout.nodes[2].id, None);
    assert_eq!(layout.nodes[2].value, Value::Str("NULL".to_owned()));

    assert_eq!(layout.edges.len(), 2);
    assert!(layout.edges.iter().all(|edge| !edge.is_cycle));

    assert!(
        layout.nodes[0].x < layout.nodes[1].x && layout.nodes[1].x < layout.nodes[2].x,
        "nodes advance left to right"
    );
    assert_eq!(layout.nodes[0].y, layout.nodes[1].y, "chain stays on one row");
}

/// A circular list emits exactly one back-edge to the first occurrence and
/// stops instead of looping.
#[test]
fn circular_list_emits_single_back_edge() {
    let objects = vec![
        instance("obj1", indexmap! { "next".to_owned() => r("obj2") }),
        instance("obj2", indexmap! { "next".to_owned() => r("obj1") }),
    ];
    let frames = main_frame(indexmap! { "head".to_owned() => r("obj1") });
    let layout = list::build(&objects, &ObjectId::from("obj1"), &frames).unwrap();

    assert_eq!(layout.nodes.len(), 2, "no sentinel on a circular list");
    let cycles: Vec<_> = layout.edges.iter().filter(|edge| edge.is_cycle).collect();
    assert_eq!(cycles.len(), 1, "exactly one back-edge");
    assert_eq!(cycles[0].from, 1);
    assert_eq!(cycles[0].to, 0, "back-edge targets the first occurrence");
}

/// Every innermost-frame alias of a node becomes a pointer label; multiple
/// aliases stack on the same node.
#[test]
fn stack_pointer_annotations_collect_all_aliases() {
    let objects = vec![
        instance("obj1", indexmap! { "next".to_owned() => r("obj2") }),
        instance("obj2", indexmap! { "next".to_owned() => Value::None }),
    ];
    let frames = main_frame(indexmap! {
        "head".to_owned() => r("obj1"),
        "slow".to_owned() => r("obj1"),
        "fast".to_owned() => r("obj2"),
        "n".to_owned() => Value::Int(2),
    });
    let layout = list::build(&objects, &ObjectId::from("obj1"), &frames).unwrap();
    assert_eq!(layout.nodes[0].pointer_labels, ["head", "slow"]);
    assert_eq!(layout.nodes[1].pointer_labels, ["fast"]);
    assert!(layout.nodes[2].pointer_labels.is_empty(), "sentinels carry no labels");
}

/// A dangling forward pointer ends the walk with a `missing` marker rather
/// than a crash.
#[test]
fn dangling_next_pointer_renders_missing_marker() {
    let objects = vec![instance("obj1", indexmap! { "next".to_owned() => r("obj9") })];
    let frames = main_frame(indexmap! { "head".to_owned() => r("obj1") });
    let layout = list::build(&objects, &ObjectId::from("obj1"), &frames).unwrap();
    assert_eq!(layout.nodes.len(), 2);
    assert_eq!(layout.nodes[1].value, Value::Str("missing".to_owned()));
    assert_eq!(layout.nodes[1].id, None);
}

/// The displayed data is the first non-pointer payload field.
#[test]
fn node_value_uses_first_data_field() {
    let objects = vec![instance(
        "obj1",
        indexmap! { "next".to_owned() => Value::None, "val".to_owned() => Value::Int(42) },
    )];
    let frames = main_frame(indexmap! { "head".to_owned() => r("obj1") });
    let layout = list::build(&objects, &ObjectId::from("obj1"), &frames).unwrap();
    assert_eq!(layout.nodes[0].value, Value::Int(42));
}
