//! Force simulation
//!
//! This module contains the numerical core of the layout engine: the
//! [`SimulationState`] arena built by [`crate::graph::build`], the force field
//! that superposes spring, charge, and center forces, the damped Euler
//! integrator, and the [`Simulation`] driver that steps them for a fixed
//! number of ticks.

mod engine;
mod forces;
mod integrator;
mod state;

pub use engine::{Phase, Simulation};
pub use state::{NodeIndex, SimulationState};

pub(crate) use state::{SimLink, SimNode};
