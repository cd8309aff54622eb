//! Force field
//!
//! Each tick the net force on every node is the superposition of three
//! forces, each implementing [`Force`]:
//!
//! - [`LinkForce`]: Hooke springs along links
//! - [`ChargeForce`]: inverse-square pairwise charge between every pair of nodes
//! - [`CenterForce`]: a pull of the free-node centroid toward the configured center
//!
//! Forces only read positions; nothing here mutates the state, so every force
//! of a tick sees the same snapshot.
//!
//! The charge force visits every unordered pair, which is O(n²) per tick. That
//! is fine for a few hundred relays. Larger graphs would need a spatial
//! approximation such as a Barnes–Hut quadtree, which this engine does not do.

use relaymap_core::geometry::Point;

use crate::config::LayoutConfig;

use super::state::SimulationState;

/// One additive contribution to the net force on each node.
pub(crate) trait Force {
    /// Adds this force's contribution for every node into `forces`.
    ///
    /// `forces` is indexed like the state's node arena.
    fn accumulate(&self, state: &SimulationState, forces: &mut [Point]);
}

/// Springs along links, with Newton's third law pairing on each endpoint.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct LinkForce;

impl Force for LinkForce {
    fn accumulate(&self, state: &SimulationState, forces: &mut [Point]) {
        for link in state.links() {
            let (source, target) = (link.source.index(), link.target.index());
            if source == target {
                continue;
            }
            let (unit, distance) = state.direction(source, target);
            let pull = unit.scale(link.strength * (distance - link.rest_length));
            forces[source] = forces[source].add_point(pull);
            forces[target] = forces[target].sub_point(pull);
        }
    }
}

/// Pairwise inverse-square force; negative strength repels.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ChargeForce {
    strength: f64,
    min_distance: f64,
}

impl Force for ChargeForce {
    fn accumulate(&self, state: &SimulationState, forces: &mut [Point]) {
        if self.strength == 0.0 {
            return;
        }
        let nodes = state.nodes();
        for i in 0..nodes.len() {
            for j in (i + 1)..nodes.len() {
                let (unit, distance) = state.direction(i, j);
                let clamped = distance.max(self.min_distance);
                let magnitude = self.strength * nodes[i].charge_weight * nodes[j].charge_weight
                    / (clamped * clamped);
                let push = unit.scale(magnitude);
                forces[i] = forces[i].add_point(push);
                forces[j] = forces[j].sub_point(push);
            }
        }
    }
}

/// Pulls the centroid of free nodes toward a fixed point.
///
/// Each free node receives `strength × displacement × mass`, so all of them
/// accelerate identically and the layout translates without deforming.
#[derive(Debug, Clone, Copy)]
pub(crate) struct CenterForce {
    strength: f64,
    center: Point,
}

impl Force for CenterForce {
    fn accumulate(&self, state: &SimulationState, forces: &mut [Point]) {
        if self.strength == 0.0 {
            return;
        }
        let (sum, count) = state
            .nodes()
            .iter()
            .filter(|node| !node.fixed)
            .fold((Point::default(), 0usize), |(sum, count), node| {
                (sum.add_point(node.position), count + 1)
            });
        if count == 0 {
            return;
        }

        let centroid = sum.scale(1.0 / count as f64);
        let displacement = self.center.sub_point(centroid).scale(self.strength);
        for (force, node) in forces.iter_mut().zip(state.nodes()) {
            if !node.fixed {
                *force = force.add_point(displacement.scale(node.mass));
            }
        }
    }
}

/// The three forces of the layout, applied together.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ForceField {
    link: LinkForce,
    charge: ChargeForce,
    center: CenterForce,
}

impl ForceField {
    pub(crate) fn from_config(config: &LayoutConfig) -> Self {
        Self {
            link: LinkForce,
            charge: ChargeForce {
                strength: config.charge_strength(),
                min_distance: config.min_distance(),
            },
            center: CenterForce {
                strength: config.center_strength(),
                center: config.center(),
            },
        }
    }

    /// Overwrites `forces` with the net force on each node for the current positions.
    pub(crate) fn compute(&self, state: &SimulationState, forces: &mut [Point]) {
        forces.fill(Point::default());
        self.link.accumulate(state, forces);
        self.charge.accumulate(state, forces);
        self.center.accumulate(state, forces);
    }
}
