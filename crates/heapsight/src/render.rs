//! Render-ready output models, one per detected shape.
//!
//! These are the crate's only products: positioned nodes and edges the host
//! renderer draws directly. All models serialize to the host-facing
//! camelCase JSON schema. Nothing here refers back to the input step, so a
//! model stays valid after its step is discarded.

use serde::Serialize;

use crate::{
    reach::ReachabilityReport,
    step::HeapObject,
    value::{ObjectId, Value},
};

/// Sequential cell layout for array-shaped roots.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrayLayout {
    pub cells: Vec<ArrayCell>,
}

/// One array cell. `value: None` is the placeholder cell rendered for an
/// empty sequence.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrayCell {
    pub index: usize,
    pub value: Option<Value>,
}

/// Left-to-right chain layout for linked lists.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListLayout {
    pub nodes: Vec<ListNode>,
    pub edges: Vec<ListEdge>,
}

/// One list node. Sentinels (the terminal `NULL` box, a `missing` marker for
/// a dangling pointer) carry `id: None` and their marker text as the value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListNode {
    pub id: Option<ObjectId>,
    /// The node's displayed data: its first non-pointer field.
    pub value: Value,
    pub x: f64,
    pub y: f64,
    /// Innermost-frame variable names aliasing this node, stacked as labeled
    /// arrows by the renderer.
    pub pointer_labels: Vec<String>,
}

/// Edge between two list nodes, endpoints as indices into `nodes`. A cycle
/// edge is the single curved back-edge emitted when the walk revisits a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListEdge {
    pub from: usize,
    pub to: usize,
    pub is_cycle: bool,
}

/// Recursive structure layout for trees.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeLayout {
    pub root: TreeNode,
}

/// One tree node. A branch revisiting an ancestor renders a terminal
/// `Cycle` leaf (id of the revisited node); a dangling child renders a
/// `missing` leaf with no id.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeNode {
    pub name: String,
    pub id: Option<ObjectId>,
    pub children: Vec<TreeNode>,
}

/// Force-directed placement for general graphs.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphLayout {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    pub id: ObjectId,
    /// The node's displayed data: its first non-pointer field.
    pub value: Value,
    pub x: f64,
    pub y: f64,
}

/// Graph edge as resolved endpoint coordinates. Self-loops and duplicate
/// edges are kept as-is.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphEdge {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

/// Fallback view when no shape matched: reachable objects (plus all mirrors)
/// stacked vertically by the renderer, hidden objects revealable on demand.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenericLayout {
    pub visible: Vec<HeapObject>,
    pub hidden: Vec<HeapObject>,
}

impl From<ReachabilityReport> for GenericLayout {
    fn from(report: ReachabilityReport) -> Self {
        Self {
            visible: report.visible,
            hidden: report.hidden,
        }
    }
}

/// The render model for one step, tagged by detected shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "shape")]
pub enum RenderModel {
    Array(ArrayLayout),
    LinkedList(ListLayout),
    Tree(TreeLayout),
    Graph(GraphLayout),
    Generic(GenericLayout),
}
