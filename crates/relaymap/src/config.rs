//! Configuration types for Relaymap layouts.
//!
//! This module provides configuration structures that control the force
//! simulation and the colors attached to laid-out nodes. All types implement
//! [`serde::Deserialize`] so they can be loaded from a TOML file.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining layout and style settings.
//! - [`LayoutConfig`] - Simulation parameters: spring, charge, and center forces, damping,
//!   tick budget, and placement seed.
//! - [`StyleConfig`] - Optional per-role color overrides.
//!
//! # Example
//!
//! ```
//! # use relaymap::config::{AppConfig, LayoutConfig};
//! let config = AppConfig::default();
//! assert_eq!(config.layout().tick_count(), 180);
//! assert!(config.layout().validate().is_ok());
//!
//! let tuned = LayoutConfig::default().with_tick_count(60).with_seed(7);
//! assert_eq!(tuned.seed(), 7);
//! ```

use serde::{Deserialize, Serialize};

use relaymap_core::{color::Color, geometry::Point, role::Role};

use crate::error::GraphError;

/// Top-level configuration combining layout and style settings.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct AppConfig {
    /// Layout configuration section.
    #[serde(default)]
    layout: LayoutConfig,

    /// Style configuration section.
    #[serde(default)]
    style: StyleConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] with the specified layout and style configurations.
    pub fn new(layout: LayoutConfig, style: StyleConfig) -> Self {
        Self { layout, style }
    }

    /// Returns the layout configuration.
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Returns the style configuration.
    pub fn style(&self) -> &StyleConfig {
        &self.style
    }
}

/// Parameters of one force simulation run.
///
/// Charge follows the usual force-layout sign convention: negative values
/// repel, positive values attract.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LayoutConfig {
    link_distance: f64,
    link_strength: f64,
    charge_strength: f64,
    center_strength: f64,
    /// Separation below which repulsion stops growing
    min_distance: f64,
    center_x: f64,
    center_y: f64,
    tick_count: usize,
    damping: f64,
    seed: u64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            link_distance: 90.0,
            link_strength: 0.5,
            charge_strength: -220.0,
            center_strength: 0.1,
            min_distance: 10.0,
            center_x: 0.0,
            center_y: 0.0,
            tick_count: 180,
            damping: 0.9,
            seed: 0,
        }
    }
}

impl LayoutConfig {
    /// Rest length applied to links that do not carry their own distance
    pub fn link_distance(&self) -> f64 {
        self.link_distance
    }

    /// Spring stiffness before per-link weighting
    pub fn link_strength(&self) -> f64 {
        self.link_strength
    }

    /// Coulomb constant of the pairwise force
    pub fn charge_strength(&self) -> f64 {
        self.charge_strength
    }

    /// Stiffness of the pull toward the configured center
    pub fn center_strength(&self) -> f64 {
        self.center_strength
    }

    /// Separation below which repulsion stops growing
    pub fn min_distance(&self) -> f64 {
        self.min_distance
    }

    /// Point the centroid of free nodes is pulled toward
    pub fn center(&self) -> Point {
        Point::new(self.center_x, self.center_y)
    }

    /// Number of integration steps in one run
    pub fn tick_count(&self) -> usize {
        self.tick_count
    }

    /// Per-tick velocity retention factor
    pub fn damping(&self) -> f64 {
        self.damping
    }

    /// Seed for initial placement
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Set the default link rest length
    pub fn with_link_distance(mut self, distance: f64) -> Self {
        self.link_distance = distance;
        self
    }

    /// Set the base spring stiffness
    pub fn with_link_strength(mut self, strength: f64) -> Self {
        self.link_strength = strength;
        self
    }

    /// Set the pairwise charge constant
    pub fn with_charge_strength(mut self, strength: f64) -> Self {
        self.charge_strength = strength;
        self
    }

    /// Set the center pull stiffness; zero disables the center force
    pub fn with_center_strength(mut self, strength: f64) -> Self {
        self.center_strength = strength;
        self
    }

    /// Set the minimum separation used by the charge force
    pub fn with_min_distance(mut self, distance: f64) -> Self {
        self.min_distance = distance;
        self
    }

    /// Set the center the layout is pulled toward
    pub fn with_center(mut self, x: f64, y: f64) -> Self {
        self.center_x = x;
        self.center_y = y;
        self
    }

    /// Set the number of ticks
    pub fn with_tick_count(mut self, ticks: usize) -> Self {
        self.tick_count = ticks;
        self
    }

    /// Set the damping factor
    pub fn with_damping(mut self, damping: f64) -> Self {
        self.damping = damping;
        self
    }

    /// Set the placement seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Checks every parameter against the range the integrator is stable for.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::InvalidConfiguration`] naming the first offending field.
    pub fn validate(&self) -> Result<(), GraphError> {
        if self.tick_count == 0 {
            return Err(GraphError::invalid_config(
                "tick_count",
                "must be greater than zero",
            ));
        }
        if !self.link_distance.is_finite() || self.link_distance < 0.0 {
            return Err(GraphError::invalid_config(
                "link_distance",
                format!("must be a finite, non-negative number, got {}", self.link_distance),
            ));
        }
        check_unit_interval("link_strength", self.link_strength)?;
        if !self.charge_strength.is_finite() {
            return Err(GraphError::invalid_config(
                "charge_strength",
                format!("must be finite, got {}", self.charge_strength),
            ));
        }
        check_unit_interval("center_strength", self.center_strength)?;
        if !self.min_distance.is_finite() || self.min_distance <= 0.0 {
            return Err(GraphError::invalid_config(
                "min_distance",
                format!("must be a finite, positive number, got {}", self.min_distance),
            ));
        }
        if !(self.damping > 0.0 && self.damping < 1.0) {
            return Err(GraphError::invalid_config(
                "damping",
                format!("must lie strictly between 0 and 1, got {}", self.damping),
            ));
        }
        if !self.center_x.is_finite() {
            return Err(GraphError::invalid_config("center_x", "must be finite"));
        }
        if !self.center_y.is_finite() {
            return Err(GraphError::invalid_config("center_y", "must be finite"));
        }
        Ok(())
    }
}

fn check_unit_interval(field: &'static str, value: f64) -> Result<(), GraphError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(GraphError::invalid_config(
            field,
            format!("must lie between 0 and 1, got {value}"),
        ))
    }
}

/// Per-role color overrides.
///
/// Fields that are not set fall back to the role table's default color.
#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
pub struct StyleConfig {
    #[serde(default)]
    guard_color: Option<String>,

    #[serde(default)]
    middle_color: Option<String>,

    #[serde(default)]
    exit_color: Option<String>,
}

impl StyleConfig {
    /// Sets the color override for one role.
    pub fn with_color(mut self, role: Role, color: impl Into<String>) -> Self {
        let slot = match role {
            Role::Guard => &mut self.guard_color,
            Role::Middle => &mut self.middle_color,
            Role::Exit => &mut self.exit_color,
        };
        *slot = Some(color.into());
        self
    }

    /// Returns the [`Color`] nodes of `role` are painted with.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured override cannot be parsed into a valid [`Color`].
    pub fn color_for(&self, role: Role) -> Result<Color, String> {
        let configured = match role {
            Role::Guard => &self.guard_color,
            Role::Middle => &self.middle_color,
            Role::Exit => &self.exit_color,
        };
        match configured {
            Some(color) => Color::new(color)
                .map_err(|err| format!("Invalid {role} color in config: {err}")),
            None => Ok(role.default_color()),
        }
    }

    /// Resolves the color of every role, failing on the first invalid override.
    pub fn palette(&self) -> Result<Palette, String> {
        Ok(Palette {
            guard: self.color_for(Role::Guard)?,
            middle: self.color_for(Role::Middle)?,
            exit: self.color_for(Role::Exit)?,
        })
    }
}

/// Resolved colors for every role.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    guard: Color,
    middle: Color,
    exit: Color,
}

impl Palette {
    /// Returns the color for `role`
    pub fn get(&self, role: Role) -> Color {
        match role {
            Role::Guard => self.guard,
            Role::Middle => self.middle,
            Role::Exit => self.exit,
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            guard: Role::Guard.default_color(),
            middle: Role::Middle.default_color(),
            exit: Role::Exit.default_color(),
        }
    }
}
