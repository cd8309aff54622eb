//! Input graph model and simulation construction.
//!
//! A [`Graph`] is the caller-facing description of what to lay out: relays
//! ([`NodeSpec`]) and weighted circuit links ([`LinkSpec`]) that refer to
//! relays by id. [`build`] validates the whole description and materializes
//! it into a [`SimulationState`] in which links carry node indices instead of
//! ids. Validation is all-or-nothing: a single bad reference rejects the whole
//! graph, and nothing is ever simulated from a partial build.

use indexmap::{IndexMap, map::Entry};
use log::debug;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use relaymap_core::{geometry::Point, role::Role};

use crate::{
    config::LayoutConfig,
    error::GraphError,
    simulation::{NodeIndex, SimLink, SimNode, SimulationState},
};

/// A relay-network graph to lay out.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    #[serde(default)]
    pub nodes: Vec<NodeSpec>,
    #[serde(default)]
    pub links: Vec<LinkSpec>,
}

impl Graph {
    /// Creates a graph from its nodes and links.
    pub fn new(nodes: Vec<NodeSpec>, links: Vec<LinkSpec>) -> Self {
        Self { nodes, links }
    }
}

/// One relay in the input graph.
///
/// `x`/`y` give an explicit starting position; when absent, the node is
/// placed deterministically from its id and the configured seed. A `fixed`
/// node never moves but still pushes and pulls the others.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSpec {
    pub id: String,
    pub role: Role,
    /// Declared number of circuit links through this relay
    #[serde(default)]
    pub degree: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub fixed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// Observed bandwidth in MB/s
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bandwidth: Option<f64>,
}

impl NodeSpec {
    /// Creates a node with no position, degree, or metadata.
    pub fn new(id: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            role,
            degree: 0.0,
            x: None,
            y: None,
            fixed: false,
            nickname: None,
            country: None,
            bandwidth: None,
        }
    }

    /// Sets the declared degree
    pub fn with_degree(mut self, degree: f64) -> Self {
        self.degree = degree;
        self
    }

    /// Sets an explicit starting position
    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.x = Some(x);
        self.y = Some(y);
        self
    }

    /// Pins the node at its starting position
    pub fn pinned(mut self) -> Self {
        self.fixed = true;
        self
    }

    /// Returns the explicit starting position, if one was given.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::MismatchedPosition`] when only one coordinate is
    /// set, and [`GraphError::InvalidPosition`] when a coordinate is NaN or
    /// infinite.
    pub fn position(&self) -> Result<Option<Point>, GraphError> {
        match (self.x, self.y) {
            (Some(x), Some(y)) if x.is_finite() && y.is_finite() => Ok(Some(Point::new(x, y))),
            (Some(_), Some(_)) => Err(GraphError::InvalidPosition {
                id: self.id.clone(),
            }),
            (None, None) => Ok(None),
            _ => Err(GraphError::MismatchedPosition {
                id: self.id.clone(),
            }),
        }
    }
}

/// A weighted connection between two relays, referenced by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkSpec {
    pub source: String,
    pub target: String,
    /// Scales the configured link strength; clamped so the result stays within `[0, 1]`
    #[serde(default = "default_weight")]
    pub weight: f64,
    /// Rest length override for this link
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<f64>,
}

fn default_weight() -> f64 {
    1.0
}

impl LinkSpec {
    /// Creates a link with unit weight.
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            weight: default_weight(),
            distance: None,
            latency_ms: None,
        }
    }

    /// Sets the weight
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    /// Sets a rest length that overrides the configured link distance
    pub fn with_distance(mut self, distance: f64) -> Self {
        self.distance = Some(distance);
        self
    }
}

/// Validates `graph` against `config` and builds the initial simulation state.
///
/// Nodes keep their input order; link endpoints are resolved to indices into
/// that order. Mass grows with degree, taking the larger of the declared
/// degree and the number of resolved links.
///
/// # Errors
///
/// - [`GraphError::InvalidConfiguration`] if `config` fails validation
/// - [`GraphError::DuplicateNodeId`] if two nodes share an id
/// - [`GraphError::InvalidDegree`] if a declared degree is negative or non-finite
/// - [`GraphError::MismatchedPosition`] if a node sets only one coordinate
/// - [`GraphError::InvalidPosition`] if a coordinate is NaN or infinite
/// - [`GraphError::InvalidLinkWeight`] if a weight is negative or non-finite
/// - [`GraphError::InvalidConfiguration`] if a per-link rest length is negative or non-finite
/// - [`GraphError::UnknownNodeReference`] if a link names a node that does not exist
pub fn build(graph: &Graph, config: &LayoutConfig) -> Result<SimulationState, GraphError> {
    config.validate()?;

    let mut index_by_id: IndexMap<&str, NodeIndex> = IndexMap::with_capacity(graph.nodes.len());
    for (idx, node) in graph.nodes.iter().enumerate() {
        match index_by_id.entry(node.id.as_str()) {
            Entry::Occupied(_) => return Err(GraphError::DuplicateNodeId(node.id.clone())),
            Entry::Vacant(slot) => {
                slot.insert(NodeIndex::new(idx));
            }
        }
    }

    let resolve = |link_index: usize, id: &str| {
        index_by_id
            .get(id)
            .copied()
            .ok_or_else(|| GraphError::UnknownNodeReference {
                link_index,
                missing_id: id.to_string(),
            })
    };

    let mut links = Vec::with_capacity(graph.links.len());
    let mut counted_degree = vec![0usize; graph.nodes.len()];
    for (link_index, link) in graph.links.iter().enumerate() {
        if !link.weight.is_finite() || link.weight < 0.0 {
            return Err(GraphError::InvalidLinkWeight {
                link_index,
                weight: link.weight,
            });
        }
        let rest_length = link.distance.unwrap_or(config.link_distance());
        if !rest_length.is_finite() || rest_length < 0.0 {
            return Err(GraphError::invalid_config(
                "link_distance",
                format!("link {link_index} has invalid rest length {rest_length}"),
            ));
        }

        let source = resolve(link_index, &link.source)?;
        let target = resolve(link_index, &link.target)?;
        if source != target {
            counted_degree[source.index()] += 1;
            counted_degree[target.index()] += 1;
        }

        links.push(SimLink {
            source,
            target,
            rest_length,
            strength: (config.link_strength() * link.weight).clamp(0.0, 1.0),
        });
    }

    let spread = placement_radius(config, graph.nodes.len());
    let mut nodes = Vec::with_capacity(graph.nodes.len());
    for (node, &counted) in graph.nodes.iter().zip(&counted_degree) {
        if !node.degree.is_finite() || node.degree < 0.0 {
            return Err(GraphError::InvalidDegree {
                id: node.id.clone(),
                degree: node.degree,
            });
        }
        let position = match node.position()? {
            Some(position) => position,
            None => seeded_position(config.center(), spread, config.seed(), &node.id),
        };
        let style = node.role.style();
        let degree = node.degree.max(counted as f64);

        nodes.push(SimNode {
            id: node.id.clone(),
            id_hash: id_hash(&node.id),
            role: node.role,
            position,
            velocity: Point::default(),
            mass: style.mass * (1.0 + degree),
            charge_weight: style.charge_weight,
            fixed: node.fixed,
        });
    }

    debug!(
        node_count = nodes.len(),
        link_count = links.len(),
        placement_radius = spread;
        "Graph resolved into simulation state"
    );

    Ok(SimulationState::new(nodes, links, config.clone()))
}

/// Radius of the disc unpositioned nodes are scattered over.
fn placement_radius(config: &LayoutConfig, node_count: usize) -> f64 {
    let unit = config.link_distance().max(config.min_distance());
    unit * (node_count as f64).sqrt().max(1.0)
}

/// Hash of a node id: the leading eight bytes of its SHA-256, little-endian.
///
/// Identical on every platform and toolchain.
pub(crate) fn id_hash(id: &str) -> u64 {
    leading_u64(&Sha256::digest(id.as_bytes()))
}

pub(crate) fn leading_u64(digest: &[u8]) -> u64 {
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(bytes)
}

/// Uniform point in the disc of `radius` around `center`.
///
/// The generator is keyed with SHA-256 over the little-endian seed followed
/// by the id bytes.
fn seeded_position(center: Point, radius: f64, seed: u64, id: &str) -> Point {
    let mut hasher = Sha256::new();
    hasher.update(seed.to_le_bytes());
    hasher.update(id.as_bytes());
    let mut key = [0u8; 32];
    key.copy_from_slice(&hasher.finalize());

    let mut rng = ChaCha8Rng::from_seed(key);
    let turns: f64 = rng.random();
    let r = radius * rng.random::<f64>().sqrt();
    center.add_point(Point::from_turns(turns).scale(r))
}

#[cfg(test)]
mod tests {
    use float_cmp::approx_eq;

    use super::*;

    fn circuit() -> Graph {
        Graph::new(
            vec![
                NodeSpec::new("g", Role::Guard),
                NodeSpec::new("m", Role::Middle),
                NodeSpec::new("e", Role::Exit),
            ],
            vec![
                LinkSpec::new("g", "m").with_weight(0.5),
                LinkSpec::new("m", "e"),
            ],
        )
    }

    #[test]
    fn test_build_resolves_links_to_indices() {
        let state = build(&circuit(), &LayoutConfig::default()).unwrap();
        assert_eq!(state.node_count(), 3);
        assert_eq!(state.link_count(), 2);

        let link = &state.links()[0];
        assert_eq!(link.source.index(), 0);
        assert_eq!(link.target.index(), 1);
        assert_eq!(state.tick(), 0);
    }

    #[test]
    fn test_build_scales_strength_by_weight() {
        let state = build(&circuit(), &LayoutConfig::default()).unwrap();
        assert_eq!(state.links()[0].strength, 0.25);
        assert_eq!(state.links()[1].strength, 0.5);
    }

    #[test]
    fn test_build_clamps_strength_to_unit_interval() {
        let graph = Graph::new(
            vec![NodeSpec::new("a", Role::Middle), NodeSpec::new("b", Role::Middle)],
            vec![LinkSpec::new("a", "b").with_weight(10.0)],
        );
        let state = build(&graph, &LayoutConfig::default()).unwrap();
        assert_eq!(state.links()[0].strength, 1.0);
    }

    #[test]
    fn test_build_uses_link_distance_override() {
        let graph = Graph::new(
            vec![NodeSpec::new("a", Role::Middle), NodeSpec::new("b", Role::Middle)],
            vec![LinkSpec::new("a", "b").with_distance(42.0)],
        );
        let state = build(&graph, &LayoutConfig::default()).unwrap();
        assert_eq!(state.links()[0].rest_length, 42.0);
    }

    #[test]
    fn test_build_mass_uses_larger_degree() {
        let mut graph = circuit();
        graph.nodes[0].degree = 4.0;
        let state = build(&graph, &LayoutConfig::default()).unwrap();

        // declared degree wins for the guard, counted degree for the middle
        assert_eq!(state.nodes()[0].mass, Role::Guard.style().mass * 5.0);
        assert_eq!(state.nodes()[1].mass, Role::Middle.style().mass * 3.0);
        assert_eq!(state.nodes()[2].mass, Role::Exit.style().mass * 2.0);
    }

    #[test]
    fn test_self_loop_does_not_count_towards_degree() {
        let graph = Graph::new(
            vec![NodeSpec::new("a", Role::Middle)],
            vec![LinkSpec::new("a", "a")],
        );
        let state = build(&graph, &LayoutConfig::default()).unwrap();
        assert_eq!(state.nodes()[0].mass, Role::Middle.style().mass);
        assert_eq!(state.link_count(), 1);
    }

    #[test]
    fn test_unknown_reference_aborts_build() {
        let mut graph = circuit();
        graph.links.push(LinkSpec::new("e", "ghost"));
        let err = build(&graph, &LayoutConfig::default()).unwrap_err();
        assert_eq!(
            err,
            GraphError::UnknownNodeReference {
                link_index: 2,
                missing_id: "ghost".to_string()
            }
        );
    }

    #[test]
    fn test_duplicate_id_aborts_build() {
        let mut graph = circuit();
        graph.nodes.push(NodeSpec::new("m", Role::Exit));
        let err = build(&graph, &LayoutConfig::default()).unwrap_err();
        assert_eq!(err, GraphError::DuplicateNodeId("m".to_string()));
    }

    #[test]
    fn test_invalid_weight_aborts_build() {
        for weight in [-0.5, f64::NAN, f64::INFINITY] {
            let graph = Graph::new(
                vec![NodeSpec::new("a", Role::Guard), NodeSpec::new("b", Role::Exit)],
                vec![LinkSpec::new("a", "b").with_weight(weight)],
            );
            assert!(matches!(
                build(&graph, &LayoutConfig::default()),
                Err(GraphError::InvalidLinkWeight { link_index: 0, .. })
            ));
        }
    }

    #[test]
    fn test_invalid_config_checked_before_graph() {
        let mut graph = circuit();
        graph.links.push(LinkSpec::new("e", "ghost"));
        let config = LayoutConfig::default().with_tick_count(0);
        assert!(matches!(
            build(&graph, &config),
            Err(GraphError::InvalidConfiguration { field: "tick_count", .. })
        ));
    }

    #[test]
    fn test_half_position_rejected() {
        let mut node = NodeSpec::new("a", Role::Guard);
        node.x = Some(1.0);
        let graph = Graph::new(vec![node], vec![]);
        assert_eq!(
            build(&graph, &LayoutConfig::default()).unwrap_err(),
            GraphError::MismatchedPosition { id: "a".to_string() }
        );
    }

    #[test]
    fn test_non_finite_position_rejected() {
        for (x, y) in [(f64::NAN, 0.0), (0.0, f64::INFINITY), (f64::NEG_INFINITY, f64::NAN)] {
            let graph = Graph::new(
                vec![
                    NodeSpec::new("a", Role::Middle).at(0.0, 0.0),
                    NodeSpec::new("bad", Role::Guard).at(x, y),
                ],
                vec![LinkSpec::new("a", "bad")],
            );
            assert_eq!(
                build(&graph, &LayoutConfig::default()).unwrap_err(),
                GraphError::InvalidPosition { id: "bad".to_string() },
                "({x}, {y})"
            );
        }
    }

    #[test]
    fn test_invalid_degree_rejected() {
        for degree in [-1.0, f64::NAN, f64::INFINITY] {
            let graph = Graph::new(vec![NodeSpec::new("a", Role::Exit).with_degree(degree)], vec![]);
            assert!(matches!(
                build(&graph, &LayoutConfig::default()),
                Err(GraphError::InvalidDegree { .. })
            ));
        }
    }

    #[test]
    fn test_fractional_degree_from_json() {
        let graph: Graph = serde_json::from_str(
            r#"{"nodes": [{"id": "a", "role": "middle", "degree": 2.0}, {"id": "b", "role": "middle", "degree": 3}]}"#,
        )
        .unwrap();
        assert_eq!(graph.nodes[0].degree, 2.0);
        assert_eq!(graph.nodes[1].degree, 3.0);

        let state = build(&graph, &LayoutConfig::default()).unwrap();
        assert_eq!(state.nodes()[0].mass, Role::Middle.style().mass * 3.0);
        assert_eq!(state.nodes()[1].mass, Role::Middle.style().mass * 4.0);
    }

    #[test]
    fn test_id_hash_is_pinned() {
        assert_eq!(id_hash("relay-7"), 0xc6c3_aa8f_a38d_ef50);
    }

    #[test]
    fn test_seeded_position_is_pinned() {
        let graph = Graph::new(vec![NodeSpec::new("relay-7", Role::Middle)], vec![]);
        let state = build(&graph, &LayoutConfig::default().with_seed(42)).unwrap();
        let position = state.nodes()[0].position;
        assert!(approx_eq!(f64, position.x(), 40.50259069004362, epsilon = 1e-9));
        assert!(approx_eq!(f64, position.y(), 32.661633071038125, epsilon = 1e-9));
    }

    #[test]
    fn test_explicit_position_is_kept() {
        let graph = Graph::new(vec![NodeSpec::new("a", Role::Guard).at(3.0, -4.0)], vec![]);
        let state = build(&graph, &LayoutConfig::default()).unwrap();
        assert_eq!(state.nodes()[0].position, Point::new(3.0, -4.0));
    }

    #[test]
    fn test_seeded_placement_is_order_independent() {
        let config = LayoutConfig::default().with_seed(11);
        let forward = build(&circuit(), &config).unwrap();

        let mut reversed = circuit();
        reversed.nodes.reverse();
        let backward = build(&reversed, &config).unwrap();

        for node in forward.nodes() {
            let twin = backward
                .nodes()
                .iter()
                .find(|other| other.id == node.id)
                .unwrap();
            assert_eq!(node.position, twin.position);
        }
    }

    #[test]
    fn test_seed_changes_placement() {
        let a = build(&circuit(), &LayoutConfig::default().with_seed(1)).unwrap();
        let b = build(&circuit(), &LayoutConfig::default().with_seed(2)).unwrap();
        assert_ne!(a.nodes()[0].position, b.nodes()[0].position);
    }

    #[test]
    fn test_placement_stays_within_radius() {
        let config = LayoutConfig::default().with_center(500.0, 300.0);
        let state = build(&circuit(), &config).unwrap();
        let radius = placement_radius(&config, 3);
        for node in state.nodes() {
            assert!(node.position.distance(config.center()) <= radius + 1e-9);
        }
    }

    #[test]
    fn test_graph_json_defaults() {
        let graph: Graph = serde_json::from_str(
            r#"{"nodes": [{"id": "a", "role": "guard"}], "links": [{"source": "a", "target": "a"}]}"#,
        )
        .unwrap();
        assert_eq!(graph.nodes[0].degree, 0.0);
        assert!(!graph.nodes[0].fixed);
        assert_eq!(graph.links[0].weight, 1.0);
    }

    #[test]
    fn test_graph_json_rejects_unknown_role() {
        let result: Result<Graph, _> =
            serde_json::from_str(r#"{"nodes": [{"id": "a", "role": "bridge"}]}"#);
        assert!(result.is_err());
    }
}
