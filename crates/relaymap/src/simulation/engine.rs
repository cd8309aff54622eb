//! Fixed-budget simulation driver.
//!
//! A [`Simulation`] takes ownership of a freshly built [`SimulationState`]
//! and moves it through `Built → Simulating → Settled`. Each tick computes
//! every force from the positions as they were at the start of the tick, then
//! integrates all nodes. There is no convergence test: a run always performs
//! exactly `tick_count` ticks, so its cost is known before it starts.

use log::{debug, trace};

use relaymap_core::geometry::Point;

use crate::{config::Palette, layout::Layout};

use super::{forces::ForceField, integrator::Integrator, state::SimulationState};

/// Where a simulation is in its fixed tick budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Built and not yet stepped
    Built,
    /// Between the first and the last tick
    Simulating { tick: usize },
    /// Tick budget exhausted; positions are final
    Settled,
}

/// Owns one layout run.
#[derive(Debug)]
pub struct Simulation {
    state: SimulationState,
    field: ForceField,
    integrator: Integrator,
    /// Scratch buffer reused across ticks
    forces: Vec<Point>,
}

impl Simulation {
    /// Wraps a built state; the simulation starts in [`Phase::Built`].
    pub fn new(state: SimulationState) -> Self {
        let field = ForceField::from_config(state.config());
        let integrator = Integrator::new(state.config().damping());
        let forces = vec![Point::default(); state.node_count()];
        Self {
            state,
            field,
            integrator,
            forces,
        }
    }

    /// Returns the current phase.
    pub fn phase(&self) -> Phase {
        let tick = self.state.tick();
        if tick >= self.state.config().tick_count() {
            Phase::Settled
        } else if tick == 0 {
            Phase::Built
        } else {
            Phase::Simulating { tick }
        }
    }

    /// Returns true once the tick budget is exhausted
    pub fn is_settled(&self) -> bool {
        self.phase() == Phase::Settled
    }

    /// Read access to the working state
    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    /// Kinetic energy of the free nodes at the current tick
    pub fn kinetic_energy(&self) -> f64 {
        self.state.kinetic_energy()
    }

    /// Performs one tick and returns the phase after it.
    ///
    /// Ticking a settled simulation does nothing.
    pub fn tick(&mut self) -> Phase {
        if self.is_settled() {
            return Phase::Settled;
        }

        self.field.compute(&self.state, &mut self.forces);
        self.integrator.step(self.state.nodes_mut(), &self.forces);
        self.state.advance_tick();

        trace!(
            tick = self.state.tick(),
            kinetic_energy = self.state.kinetic_energy();
            "Tick complete"
        );

        self.phase()
    }

    /// Runs the remaining ticks.
    pub fn run(&mut self) {
        while self.tick() != Phase::Settled {}
    }

    /// Runs to completion and reads out the final layout.
    pub fn finish(mut self, palette: &Palette) -> Layout {
        self.run();
        debug!(
            ticks = self.state.tick(),
            kinetic_energy = self.state.kinetic_energy();
            "Simulation settled"
        );
        Layout::from_state(&self.state, palette)
    }
}
