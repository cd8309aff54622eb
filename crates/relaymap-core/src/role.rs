//! Relay roles and their lookup table.
//!
//! A relay plays exactly one [`Role`] in a circuit. The role never drives
//! branching in the simulation; it only selects a row of the [`RoleStyle`]
//! table, which supplies the node's base mass, charge weight, drawn radius,
//! and default color.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::color::Color;

/// Position a relay occupies in a circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Entry relay, the first hop of a circuit
    Guard,
    /// Intermediate relay
    Middle,
    /// Relay that forwards traffic out of the network
    Exit,
}

/// Physical and visual parameters selected by a [`Role`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoleStyle {
    /// Base inertia before degree scaling
    pub mass: f64,
    /// Multiplier applied to this node's share of pairwise repulsion
    pub charge_weight: f64,
    /// Radius a renderer should draw the node with
    pub radius: f64,
    /// Default fill color as a CSS color string
    pub color: &'static str,
}

const GUARD_STYLE: RoleStyle = RoleStyle {
    mass: 1.5,
    charge_weight: 1.2,
    radius: 9.0,
    color: "#2e7d32",
};

const MIDDLE_STYLE: RoleStyle = RoleStyle {
    mass: 1.0,
    charge_weight: 1.0,
    radius: 6.0,
    color: "#1565c0",
};

const EXIT_STYLE: RoleStyle = RoleStyle {
    mass: 1.25,
    charge_weight: 1.1,
    radius: 8.0,
    color: "#c62828",
};

impl Role {
    /// Every role, in circuit order.
    pub const ALL: [Role; 3] = [Role::Guard, Role::Middle, Role::Exit];

    /// Returns the lookup-table row for this role.
    ///
    /// # Examples
    ///
    /// ```
    /// # use relaymap_core::role::Role;
    /// assert!(Role::Guard.style().mass > Role::Middle.style().mass);
    /// ```
    pub fn style(self) -> &'static RoleStyle {
        match self {
            Role::Guard => &GUARD_STYLE,
            Role::Middle => &MIDDLE_STYLE,
            Role::Exit => &EXIT_STYLE,
        }
    }

    /// Returns the lowercase name used in input and output documents
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Guard => "guard",
            Role::Middle => "middle",
            Role::Exit => "exit",
        }
    }

    /// Returns the parsed default color for this role
    pub fn default_color(self) -> Color {
        Color::new(self.style().color).expect("role table colors are valid CSS colors")
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "guard" => Ok(Role::Guard),
            "middle" => Ok(Role::Middle),
            "exit" => Ok(Role::Exit),
            other => Err(format!(
                "unknown relay role `{other}` (expected guard, middle, or exit)"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_roundtrip_through_str() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>(), Ok(role));
            assert_eq!(role.to_string(), role.as_str());
        }
    }

    #[test]
    fn test_role_from_str_rejects_unknown() {
        let err = "bridge".parse::<Role>().unwrap_err();
        assert!(err.contains("bridge"));
    }

    #[test]
    fn test_role_styles_are_positive() {
        for role in Role::ALL {
            let style = role.style();
            assert!(style.mass > 0.0);
            assert!(style.charge_weight > 0.0);
            assert!(style.radius > 0.0);
        }
    }

    #[test]
    fn test_role_default_colors_parse() {
        for role in Role::ALL {
            let _ = role.default_color();
        }
        assert_ne!(
            Role::Guard.default_color().to_string(),
            Role::Exit.default_color().to_string()
        );
    }
}
