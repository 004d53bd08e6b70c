//! The visualization router: one step in, one render model out.
//!
//! Pipeline per step: mirror the active frame's variables, filter the heap
//! by reachability, classify the candidate roots, dispatch to the matching
//! layout builder, and fall back to the generic view when nothing matched or
//! a builder declined. The whole pipeline is synchronous, allocation-only,
//! and recomputes from scratch on every call — there is no cache to go stale
//! between steps, and concurrent replay sessions need no locking.

use rand::Rng;

use crate::{
    classify::{Shape, classify},
    layout::{self, graph::ForceConfig},
    reach::{partition, reachable},
    render::{GenericLayout, RenderModel},
    step::{HeapObject, Step},
};

/// Variable names the tracer reserves for control messages rather than
/// program variables; these never get mirrors.
pub const RESERVED_VARIABLE_NAMES: &[&str] = &["Status", "Note", "Message", "Error", "Exception"];

/// Renders one step. Infallible by design: malformed objects degrade to the
/// generic view and dangling references become missing markers, never a
/// panic. Graph placement seeds from thread-local entropy; use
/// [`visualize_seeded`] for reproducible coordinates.
#[must_use]
pub fn visualize(step: &Step) -> RenderModel {
    visualize_seeded(step, &ForceConfig::default(), &mut rand::thread_rng())
}

/// [`visualize`] with explicit graph tuning and RNG, for deterministic hosts
/// and tests.
pub fn visualize_seeded(step: &Step, config: &ForceConfig, rng: &mut impl Rng) -> RenderModel {
    let mirrors = build_mirrors(step);
    // Builders see the mirrors prepended; the classifier must only ever see
    // tracer-supplied objects.
    let mut augmented = mirrors;
    augmented.extend(step.objects.iter().cloned());

    let classification = classify(&step.objects, &step.frames);
    let model = match (classification.shape, &classification.root) {
        (Shape::Array, Some(root)) => layout::array::build(&augmented, root).map(RenderModel::Array),
        (Shape::LinkedList, Some(root)) => {
            layout::list::build(&augmented, root, &step.frames).map(RenderModel::LinkedList)
        }
        (Shape::Tree, Some(root)) => layout::tree::build(&augmented, root).map(RenderModel::Tree),
        (Shape::Graph, Some(_)) => layout::graph::build(&augmented, config, rng).map(RenderModel::Graph),
        _ => None,
    };

    model.unwrap_or_else(|| {
        let reached = reachable(&step.frames, &step.objects);
        RenderModel::Generic(GenericLayout::from(partition(&augmented, &reached)))
    })
}

/// Synthesizes one variable-mirror object per innermost-frame variable, in
/// variable order, skipping the tracer's reserved control names. Mirrors let
/// every local — even a primitive — render as a heap-like box.
fn build_mirrors(step: &Step) -> Vec<HeapObject> {
    let Some(frame) = step.innermost_frame() else {
        return Vec::new();
    };
    frame
        .variables
        .iter()
        .filter(|(name, _)| !RESERVED_VARIABLE_NAMES.contains(&name.as_str()))
        .map(|(name, value)| HeapObject::mirror(name.clone(), value.clone()))
        .collect()
}

/// Convenience handle for hosts that replay steps.
///
/// Holds the graph tuning plus the most recent render model, so a host can
/// keep showing the previous frame while the next step's computation runs.
/// No other state is retained between steps.
#[derive(Debug, Default)]
pub struct Visualizer {
    config: ForceConfig,
    last: Option<RenderModel>,
}

impl Visualizer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(config: ForceConfig) -> Self {
        Self { config, last: None }
    }

    /// Renders a step and retains the result as the buffered last frame.
    pub fn render(&mut self, step: &Step) -> &RenderModel {
        let model = visualize_seeded(step, &self.config, &mut rand::thread_rng());
        self.last.insert(model)
    }

    /// The most recently rendered model, if any step has been rendered.
    #[must_use]
    pub fn last_render(&self) -> Option<&RenderModel> {
        self.last.as_ref()
    }
}
