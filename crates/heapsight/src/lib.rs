#![doc = include_str!("../../../README.md")]

mod classify;
mod error;
pub mod layout;
mod reach;
mod render;
mod router;
mod step;
mod value;

pub use crate::{
    classify::{Classification, Shape, classify},
    error::SnapshotError,
    layout::graph::ForceConfig,
    reach::{ReachabilityReport, partition, reachable},
    render::{
        ArrayCell, ArrayLayout, GenericLayout, GraphEdge, GraphLayout, GraphNode, ListEdge, ListLayout, ListNode,
        RenderModel, TreeLayout, TreeNode,
    },
    router::{RESERVED_VARIABLE_NAMES, Visualizer, visualize, visualize_seeded},
    step::{Frame, HeapObject, ObjectKind, Payload, Step},
    value::{ObjectId, REF_PREFIX, Value, is_reference},
};
