//! Force-directed graph placement.
//!
//! A fixed number of simulation iterations over three forces: inverse-square
//! repulsion between every node pair, spring attraction along edges toward a
//! rest length, and a centering pull toward the canvas center. Velocities
//! are damped each iteration so the layout settles instead of oscillating.
//! Initial positions are pseudo-random, so exact coordinates differ between
//! runs while the converged structure stays equivalent — this is the one
//! nondeterministic output of the crate, by design. O(iterations x N^2)
//! for repulsion plus O(iterations x E) for attraction.

use rand::Rng;

use crate::{
    layout::display_value,
    render::{GraphEdge, GraphLayout, GraphNode},
    step::{HeapObject, Payload},
    value::Value,
};

/// Simulation constants. `Default` matches the reference tuning; hosts can
/// override individual fields for bigger canvases or stiffer springs.
#[derive(Debug, Clone, PartialEq)]
pub struct ForceConfig {
    /// Fixed number of simulation iterations.
    pub iterations: usize,
    /// Repulsion constant, scaled by inverse squared distance.
    pub repulsion: f64,
    /// Attraction constant applied to `(distance - rest_length)`.
    pub attraction: f64,
    /// Optimal edge rest length.
    pub rest_length: f64,
    /// Per-iteration pull toward the canvas center, proportional to
    /// displacement.
    pub centering: f64,
    /// Velocity damping factor, strictly below 1.
    pub damping: f64,
    /// Canvas center nodes are pulled toward and spawned around.
    pub center: (f64, f64),
    /// Half-extent of the random initial placement box.
    pub spread: f64,
    /// Floor on squared distance, avoiding division by zero for coincident
    /// nodes.
    pub epsilon: f64,
}

impl Default for ForceConfig {
    fn default() -> Self {
        Self {
            iterations: 100,
            repulsion: 8000.0,
            attraction: 0.06,
            rest_length: 120.0,
            centering: 0.02,
            damping: 0.85,
            center: (400.0, 300.0),
            spread: 160.0,
            epsilon: 0.01,
        }
    }
}

/// Runs the simulation over every non-mirror object with an object-shaped
/// payload. Returns `None` when no object qualifies. Edges come from payload
/// references (one level into inline arrays, for adjacency-list fan-out)
/// that resolve within the node set; self-loops and duplicates are kept.
#[must_use]
pub fn build(objects: &[HeapObject], config: &ForceConfig, rng: &mut impl Rng) -> Option<GraphLayout> {
    let nodes: Vec<&HeapObject> = objects
        .iter()
        .filter(|object| {
            !object.is_mirror() && matches!(object.payload, Payload::Sequence(_) | Payload::Mapping(_))
        })
        .collect();
    if nodes.is_empty() {
        return None;
    }

    let slots: ahash::AHashMap<&str, usize> = nodes
        .iter()
        .enumerate()
        .map(|(slot, object)| (object.id.as_str(), slot))
        .collect();

    let mut edges: Vec<(usize, usize)> = Vec::new();
    for (slot, object) in nodes.iter().enumerate() {
        match &object.payload {
            Payload::Sequence(items) => {
                for item in items {
                    collect_edges(slot, item, &slots, &mut edges);
                }
            }
            Payload::Mapping(fields) => {
                for value in fields.values() {
                    collect_edges(slot, value, &slots, &mut edges);
                }
            }
            Payload::Scalar(_) => {}
        }
    }

    let positions = simulate(nodes.len(), &edges, config, rng);

    let graph_nodes = nodes
        .iter()
        .zip(&positions)
        .map(|(object, &(x, y))| GraphNode {
            id: object.id.clone(),
            value: display_value(object),
            x,
            y,
        })
        .collect();
    let graph_edges = edges
        .iter()
        .map(|&(a, b)| GraphEdge {
            x1: positions[a].0,
            y1: positions[a].1,
            x2: positions[b].0,
            y2: positions[b].1,
        })
        .collect();

    Some(GraphLayout {
        nodes: graph_nodes,
        edges: graph_edges,
    })
}

/// Collects edges from one payload value: a direct reference, or references
/// one level inside an inline sequence.
fn collect_edges(from: usize, value: &Value, slots: &ahash::AHashMap<&str, usize>, edges: &mut Vec<(usize, usize)>) {
    match value {
        Value::Ref(id) => {
            if let Some(&to) = slots.get(id.as_str()) {
                edges.push((from, to));
            }
        }
        Value::Seq(items) => {
            for item in items {
                if let Value::Ref(id) = item
                    && let Some(&to) = slots.get(id.as_str())
                {
                    edges.push((from, to));
                }
            }
        }
        _ => {}
    }
}

fn simulate(count: usize, edges: &[(usize, usize)], config: &ForceConfig, rng: &mut impl Rng) -> Vec<(f64, f64)> {
    let (cx, cy) = config.center;
    let mut positions: Vec<(f64, f64)> = (0..count)
        .map(|_| {
            (
                cx + rng.gen_range(-config.spread..=config.spread),
                cy + rng.gen_range(-config.spread..=config.spread),
            )
        })
        .collect();
    let mut velocities = vec![(0.0_f64, 0.0_f64); count];

    for _ in 0..config.iterations {
        // Repulsion: equal and opposite on every unordered pair.
        for i in 0..count {
            for j in (i + 1)..count {
                let dx = positions[i].0 - positions[j].0;
                let dy = positions[i].1 - positions[j].1;
                let dist_sq = (dx * dx + dy * dy).max(config.epsilon);
                let dist = dist_sq.sqrt();
                let force = config.repulsion / dist_sq;
                let (fx, fy) = (force * dx / dist, force * dy / dist);
                velocities[i].0 += fx;
                velocities[i].1 += fy;
                velocities[j].0 -= fx;
                velocities[j].1 -= fy;
            }
        }

        // Attraction: springs pull endpoints toward the rest length.
        for &(a, b) in edges {
            let dx = positions[b].0 - positions[a].0;
            let dy = positions[b].1 - positions[a].1;
            let dist = (dx * dx + dy * dy).sqrt().max(config.epsilon);
            let force = (dist - config.rest_length) * config.attraction;
            let (fx, fy) = (force * dx / dist, force * dy / dist);
            velocities[a].0 += fx;
            velocities[a].1 += fy;
            velocities[b].0 -= fx;
            velocities[b].1 -= fy;
        }

        // Centering pull, then damped integration.
        for i in 0..count {
            velocities[i].0 += (cx - positions[i].0) * config.centering;
            velocities[i].1 += (cy - positions[i].1) * config.centering;
            velocities[i].0 *= config.damping;
            velocities[i].1 *= config.damping;
            positions[i].0 += velocities[i].0;
            positions[i].1 += velocities[i].1;
        }
    }

    positions
}
