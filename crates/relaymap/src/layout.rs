//! Settled layout output.
//!
//! A [`Layout`] is what a renderer consumes: final node positions with the
//! role-derived radius and color, and every link with its endpoint
//! coordinates already resolved.

use serde::{Deserialize, Serialize};

use relaymap_core::{
    color::Color,
    geometry::{Bounds, Point},
    role::Role,
};

use crate::{config::Palette, simulation::SimulationState};

/// Final positions for one graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub nodes: Vec<LayoutNode>,
    pub links: Vec<LayoutLink>,
}

/// A positioned relay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutNode {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub role: Role,
    pub radius: f64,
    pub color: Color,
}

impl LayoutNode {
    /// Returns the node position as a point
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// A link with resolved endpoint coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutLink {
    pub source: String,
    pub target: String,
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl Layout {
    /// Reads final positions out of a simulation state.
    pub(crate) fn from_state(state: &SimulationState, palette: &Palette) -> Self {
        let nodes = state
            .nodes()
            .iter()
            .map(|node| LayoutNode {
                id: node.id.clone(),
                x: node.position.x(),
                y: node.position.y(),
                role: node.role,
                radius: node.role.style().radius,
                color: palette.get(node.role),
            })
            .collect();

        let links = state
            .links()
            .iter()
            .map(|link| {
                let source = &state.nodes()[link.source.index()];
                let target = &state.nodes()[link.target.index()];
                LayoutLink {
                    source: source.id.clone(),
                    target: target.id.clone(),
                    x1: source.position.x(),
                    y1: source.position.y(),
                    x2: target.position.x(),
                    y2: target.position.y(),
                }
            })
            .collect();

        Self { nodes, links }
    }

    /// Returns true if there is nothing to draw
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.links.is_empty()
    }

    /// Looks up a node by id
    pub fn node(&self, id: &str) -> Option<&LayoutNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    /// Bounding box of all node centers, grown by each node's radius.
    ///
    /// Returns `None` for a layout without nodes.
    pub fn bounds(&self) -> Option<Bounds> {
        self.nodes
            .iter()
            .map(|node| Bounds::from_point(node.position()).expand(node.radius))
            .reduce(|acc, bounds| acc.merge(&bounds))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::LayoutConfig,
        graph::{Graph, LinkSpec, NodeSpec, build},
    };

    fn built() -> Layout {
        let graph = Graph::new(
            vec![
                NodeSpec::new("g", Role::Guard).at(0.0, 0.0),
                NodeSpec::new("e", Role::Exit).at(100.0, 50.0),
            ],
            vec![LinkSpec::new("g", "e")],
        );
        let state = build(&graph, &LayoutConfig::default()).unwrap();
        Layout::from_state(&state, &Palette::default())
    }

    #[test]
    fn test_from_state_resolves_link_endpoints() {
        let layout = built();
        let link = &layout.links[0];
        assert_eq!((link.source.as_str(), link.target.as_str()), ("g", "e"));
        assert_eq!((link.x1, link.y1, link.x2, link.y2), (0.0, 0.0, 100.0, 50.0));
    }

    #[test]
    fn test_from_state_attaches_role_style() {
        let layout = built();
        let guard = layout.node("g").unwrap();
        assert_eq!(guard.radius, Role::Guard.style().radius);
        assert_eq!(guard.color, Role::Guard.default_color());
        assert!(layout.node("missing").is_none());
    }

    #[test]
    fn test_bounds_include_radius() {
        let bounds = built().bounds().unwrap();
        assert_eq!(bounds.min_x(), -Role::Guard.style().radius);
        assert_eq!(bounds.max_y(), 50.0 + Role::Exit.style().radius);
    }

    #[test]
    fn test_empty_layout() {
        let layout = Layout::default();
        assert!(layout.is_empty());
        assert!(layout.bounds().is_none());
    }

    #[test]
    fn test_layout_serializes_renderer_shape() {
        let json = serde_json::to_value(built()).unwrap();
        let node = &json["nodes"][0];
        assert_eq!(node["id"], "g");
        assert_eq!(node["role"], "guard");
        assert!(node["color"].is_string());
        let link = &json["links"][0];
        for key in ["source", "target", "x1", "y1", "x2", "y2"] {
            assert!(!link[key].is_null(), "missing {key}");
        }
    }
}
