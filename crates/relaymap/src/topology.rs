//! Synthetic relay topology.
//!
//! Produces a plausible guard → middle → exit circuit graph for demos and for
//! exercising the layout engine when no consensus data is at hand. Output
//! depends only on `limit` and `seed`.

use std::collections::HashMap;

use log::debug;
use rand::{Rng, SeedableRng, seq::IndexedRandom};
use rand_chacha::ChaCha8Rng;

use relaymap_core::role::Role;

use crate::graph::{Graph, LinkSpec, NodeSpec};

const COUNTRIES: [&str; 10] = ["US", "DE", "FR", "GB", "NL", "CA", "SE", "NO", "CH", "JP"];

/// Upper bound on generated circuits.
const MAX_CIRCUITS: usize = 200;

/// Builds a synthetic circuit topology.
///
/// `limit` is a rough node budget: a third of it becomes circuits, with at
/// least 10 and at most 200. Each circuit contributes a guard, a middle, an
/// exit, and the two links joining them.
///
/// # Examples
///
/// ```
/// let graph = relaymap::topology::synthetic(40, 7);
/// assert_eq!(graph.nodes.len(), 39);
/// assert_eq!(graph.links.len(), 26);
/// assert_eq!(graph, relaymap::topology::synthetic(40, 7));
/// ```
pub fn synthetic(limit: usize, seed: u64) -> Graph {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let circuits = (limit / 3).clamp(10, MAX_CIRCUITS);

    let mut guards = Vec::with_capacity(circuits);
    while guards.len() < circuits {
        let fingerprint = fingerprint(&mut rng);
        if !guards.contains(&fingerprint) {
            guards.push(fingerprint);
        }
    }

    let mut nodes = Vec::with_capacity(circuits * 3);
    let mut links = Vec::with_capacity(circuits * 2);
    let mut circuit_ids = Vec::with_capacity(circuits);
    for guard in &guards {
        let middle = format!("MID-{}", &guard[..12]);
        let exit = format!("EXT-{}", &guard[guard.len() - 12..]);
        circuit_ids.push((guard.clone(), middle, exit));
    }

    for role in Role::ALL {
        for (guard, middle, exit) in &circuit_ids {
            let id = match role {
                Role::Guard => guard,
                Role::Middle => middle,
                Role::Exit => exit,
            };
            nodes.push(relay(&mut rng, id, role));
        }
    }

    for (guard, middle, exit) in &circuit_ids {
        links.push(circuit_link(&mut rng, guard, middle));
        links.push(circuit_link(&mut rng, middle, exit));
    }

    let mut degrees: HashMap<&str, usize> = HashMap::new();
    for link in &links {
        *degrees.entry(link.source.as_str()).or_default() += 1;
        *degrees.entry(link.target.as_str()).or_default() += 1;
    }
    for node in &mut nodes {
        node.degree = degrees.get(node.id.as_str()).copied().unwrap_or_default() as f64;
    }

    debug!(
        circuits = circuits,
        node_count = nodes.len(),
        link_count = links.len(),
        seed = seed;
        "Generated synthetic topology"
    );

    Graph::new(nodes, links)
}

/// 40 uppercase hex digits, like a relay identity fingerprint.
fn fingerprint(rng: &mut ChaCha8Rng) -> String {
    (0..40)
        .map(|_| {
            char::from_digit(rng.random_range(0..16), 16)
                .unwrap_or('0')
                .to_ascii_uppercase()
        })
        .collect()
}

fn relay(rng: &mut ChaCha8Rng, id: &str, role: Role) -> NodeSpec {
    let prefix = match role {
        Role::Guard => "Guard",
        Role::Middle => "Middle",
        Role::Exit => "Exit",
    };
    let suffix = &id[id.len().saturating_sub(5)..];

    let mut node = NodeSpec::new(id, role);
    node.nickname = Some(format!("{prefix}{suffix}"));
    node.country = COUNTRIES.choose(rng).map(|country| country.to_string());
    node.bandwidth = Some(round_to(rng.random_range(2.0..15.0), 2));
    node
}

fn circuit_link(rng: &mut ChaCha8Rng, source: &str, target: &str) -> LinkSpec {
    let mut link = LinkSpec::new(source, target).with_weight(round_to(rng.random_range(0.1..1.0), 3));
    link.latency_ms = Some(round_to(rng.random_range(5.0..60.0), 1));
    link
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::LayoutConfig, graph::build};

    #[test]
    fn test_circuit_count_is_clamped() {
        assert_eq!(synthetic(0, 1).nodes.len(), 30);
        assert_eq!(synthetic(90, 1).nodes.len(), 90);
        assert_eq!(synthetic(10_000, 1).nodes.len(), MAX_CIRCUITS * 3);
    }

    #[test]
    fn test_same_seed_same_graph() {
        assert_eq!(synthetic(60, 3), synthetic(60, 3));
        assert_ne!(synthetic(60, 3), synthetic(60, 4));
    }

    #[test]
    fn test_ids_follow_guard_fingerprint() {
        let graph = synthetic(30, 9);
        let guard = &graph.nodes[0];
        assert_eq!(guard.role, Role::Guard);
        assert_eq!(guard.id.len(), 40);
        assert!(guard.id.chars().all(|c| c.is_ascii_hexdigit()));

        let middle = &graph.nodes[10];
        assert_eq!(middle.role, Role::Middle);
        assert_eq!(middle.id, format!("MID-{}", &guard.id[..12]));
        let exit = &graph.nodes[20];
        assert_eq!(exit.id, format!("EXT-{}", &guard.id[28..]));
    }

    #[test]
    fn test_metadata_in_expected_ranges() {
        for node in synthetic(45, 2).nodes {
            let bandwidth = node.bandwidth.unwrap();
            assert!((2.0..=15.0).contains(&bandwidth));
            assert!(COUNTRIES.contains(&node.country.as_deref().unwrap()));
            assert!(node.nickname.unwrap().ends_with(&node.id[node.id.len() - 5..]));
        }
        for link in synthetic(45, 2).links {
            assert!((0.1..=1.0).contains(&link.weight));
            assert!((5.0..=60.0).contains(&link.latency_ms.unwrap()));
        }
    }

    #[test]
    fn test_degrees_match_links() {
        let graph = synthetic(30, 5);
        for node in &graph.nodes {
            let expected = match node.role {
                Role::Middle => 2.0,
                Role::Guard | Role::Exit => 1.0,
            };
            assert_eq!(node.degree, expected, "degree of {}", node.id);
        }
    }

    #[test]
    fn test_generated_graph_builds() {
        let graph = synthetic(60, 8);
        assert!(build(&graph, &LayoutConfig::default()).is_ok());
    }
}
