//! Damped explicit Euler integration with a unit time step.

use log::warn;

use relaymap_core::geometry::Point;

use super::state::SimNode;

/// Advances velocities and positions by one tick.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Integrator {
    damping: f64,
}

impl Integrator {
    pub(crate) fn new(damping: f64) -> Self {
        Self { damping }
    }

    /// Applies `forces` to every free node:
    /// `v ← (v + F/m) · damping`, then `p ← p + v`.
    ///
    /// Fixed nodes are skipped entirely. A velocity that comes out non-finite
    /// is reset to zero so that no NaN ever reaches a position.
    pub(crate) fn step(&self, nodes: &mut [SimNode], forces: &[Point]) {
        for (node, force) in nodes.iter_mut().zip(forces) {
            if node.fixed {
                continue;
            }

            let velocity = node
                .velocity
                .add_point(force.scale(1.0 / node.mass))
                .scale(self.damping);

            node.velocity = if velocity.is_finite() {
                velocity
            } else {
                warn!(node_id = node.id.as_str(); "Discarding non-finite velocity");
                Point::default()
            };
            node.position = node.position.add_point(node.velocity);
        }
    }
}
