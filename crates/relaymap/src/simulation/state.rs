//! Simulation working set.
//!
//! Nodes live in one contiguous vector; links refer to them through
//! [`NodeIndex`] values resolved once at build time, so there are no
//! cross-references between records.

use sha2::{Digest, Sha256};

use relaymap_core::{geometry::Point, role::Role};

use crate::{config::LayoutConfig, graph::leading_u64};

/// Separations at or below this are treated as coincident points.
const COINCIDENT_EPSILON: f64 = 1e-9;

/// Index of a node in the simulation arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIndex(usize);

impl NodeIndex {
    pub(crate) fn new(index: usize) -> Self {
        NodeIndex(index)
    }

    /// Returns the position of the node in input order
    pub fn index(self) -> usize {
        self.0
    }
}

/// A node as the simulation sees it.
#[derive(Debug, Clone)]
pub(crate) struct SimNode {
    pub(crate) id: String,
    /// Precomputed hash of `id`, used for placement and tie-breaking
    pub(crate) id_hash: u64,
    pub(crate) role: Role,
    pub(crate) position: Point,
    pub(crate) velocity: Point,
    pub(crate) mass: f64,
    pub(crate) charge_weight: f64,
    pub(crate) fixed: bool,
}

/// A link with resolved endpoints. Never mutated after build.
#[derive(Debug, Clone)]
pub(crate) struct SimLink {
    pub(crate) source: NodeIndex,
    pub(crate) target: NodeIndex,
    pub(crate) rest_length: f64,
    pub(crate) strength: f64,
}

/// The mutable state of one layout run.
///
/// Created by [`crate::graph::build`], advanced in place by
/// [`crate::simulation::Simulation`], and dropped once positions have been
/// read out. It is never shared between runs.
#[derive(Debug, Clone)]
pub struct SimulationState {
    nodes: Vec<SimNode>,
    links: Vec<SimLink>,
    tick: usize,
    config: LayoutConfig,
}

impl SimulationState {
    pub(crate) fn new(nodes: Vec<SimNode>, links: Vec<SimLink>, config: LayoutConfig) -> Self {
        Self {
            nodes,
            links,
            tick: 0,
            config,
        }
    }

    /// Number of nodes in the arena
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of resolved links
    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    /// Ticks completed so far
    pub fn tick(&self) -> usize {
        self.tick
    }

    /// Configuration this run was built with
    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Current positions of all nodes, in input order
    pub fn positions(&self) -> impl Iterator<Item = Point> + '_ {
        self.nodes.iter().map(|node| node.position)
    }

    /// Sum of `m·|v|²/2` over free nodes.
    pub fn kinetic_energy(&self) -> f64 {
        self.nodes
            .iter()
            .filter(|node| !node.fixed)
            .map(|node| 0.5 * node.mass * node.velocity.length_squared())
            .sum()
    }

    pub(crate) fn nodes(&self) -> &[SimNode] {
        &self.nodes
    }

    pub(crate) fn nodes_mut(&mut self) -> &mut [SimNode] {
        &mut self.nodes
    }

    pub(crate) fn links(&self) -> &[SimLink] {
        &self.links
    }

    pub(crate) fn advance_tick(&mut self) {
        self.tick += 1;
    }

    /// Unit vector from `from` toward `to`, and the distance between them.
    ///
    /// Coincident nodes get a direction derived from their ids with distance
    /// zero; swapping the arguments always negates the direction.
    pub(crate) fn direction(&self, from: usize, to: usize) -> (Point, f64) {
        let a = &self.nodes[from];
        let b = &self.nodes[to];
        let delta = b.position.sub_point(a.position);
        let distance = delta.hypot();
        if distance > COINCIDENT_EPSILON {
            (delta.scale(1.0 / distance), distance)
        } else {
            (tie_break_direction(a, b), 0.0)
        }
    }
}

/// Direction from `a` to `b` for nodes sharing a point.
fn tie_break_direction(a: &SimNode, b: &SimNode) -> Point {
    let (low, high, sign) = if a.id <= b.id {
        (a, b, 1.0)
    } else {
        (b, a, -1.0)
    };
    let mut hasher = Sha256::new();
    hasher.update(low.id_hash.to_le_bytes());
    hasher.update(high.id_hash.to_le_bytes());
    let turns = (leading_u64(&hasher.finalize()) >> 11) as f64 / (1u64 << 53) as f64;
    Point::from_turns(turns).scale(sign)
}
