//! Relaymap - deterministic force-directed layout for relay network graphs.
//!
//! Takes an undirected graph of guard, middle, and exit relays and computes a
//! 2-D position for every relay by running a fixed number of ticks of a
//! spring/charge/centering simulation. The same graph and configuration always
//! yield the same positions.

pub mod config;
pub mod generation;
pub mod graph;
pub mod layout;
pub mod simulation;
pub mod topology;

mod error;

pub use relaymap_core::{color, geometry, role};

pub use error::{GraphError, RelaymapError};

use log::{debug, info};

use config::{AppConfig, LayoutConfig, Palette};
use graph::Graph;
use layout::Layout;
use simulation::Simulation;

/// Computes the settled layout of `graph` with the default palette.
///
/// An empty graph yields an empty layout without running any ticks.
///
/// # Errors
///
/// Returns [`GraphError`] if the graph or the configuration is rejected. No
/// error can occur once the simulation has started.
///
/// # Examples
///
/// ```
/// use relaymap::{config::LayoutConfig, graph::{Graph, LinkSpec, NodeSpec}, role::Role};
///
/// let graph = Graph::new(
///     vec![NodeSpec::new("a", Role::Guard), NodeSpec::new("b", Role::Exit)],
///     vec![LinkSpec::new("a", "b")],
/// );
/// let layout = relaymap::layout(&graph, &LayoutConfig::default()).unwrap();
/// assert_eq!(layout.nodes.len(), 2);
/// assert_eq!(layout, relaymap::layout(&graph, &LayoutConfig::default()).unwrap());
/// ```
pub fn layout(graph: &Graph, config: &LayoutConfig) -> Result<Layout, GraphError> {
    layout_with_palette(graph, config, &Palette::default())
}

/// Like [`layout`], coloring nodes from `palette`.
pub fn layout_with_palette(
    graph: &Graph,
    config: &LayoutConfig,
    palette: &Palette,
) -> Result<Layout, GraphError> {
    info!(
        node_count = graph.nodes.len(),
        link_count = graph.links.len(),
        tick_count = config.tick_count(),
        seed = config.seed();
        "Computing layout"
    );

    let state = graph::build(graph, config)?;
    if state.node_count() == 0 {
        debug!("Empty graph, skipping simulation");
        return Ok(Layout::default());
    }

    let layout = Simulation::new(state).finish(palette);

    info!(node_count = layout.nodes.len(); "Layout computed");
    Ok(layout)
}

/// Builder for turning graph documents into layout documents.
///
/// Holds the application configuration so that repeated runs share one
/// layout configuration and palette.
///
/// # Examples
///
/// ```
/// use relaymap::{LayoutBuilder, config::AppConfig};
///
/// let builder = LayoutBuilder::new(AppConfig::default());
/// let graph = builder
///     .parse_graph(r#"{"nodes": [{"id": "a", "role": "middle"}], "links": []}"#)
///     .unwrap();
/// let layout = builder.compute(&graph).unwrap();
/// let json = builder.render_json(&layout).unwrap();
/// assert!(json.contains("\"id\": \"a\""));
/// ```
#[derive(Debug, Default)]
pub struct LayoutBuilder {
    config: AppConfig,
}

impl LayoutBuilder {
    /// Create a new layout builder with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration this builder was created with
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Parse a JSON graph document.
    ///
    /// # Errors
    ///
    /// Returns [`RelaymapError::Json`] for malformed JSON, missing fields, or
    /// unknown roles.
    pub fn parse_graph(&self, source: &str) -> Result<Graph, RelaymapError> {
        let graph: Graph = serde_json::from_str(source)?;
        debug!(
            node_count = graph.nodes.len(),
            link_count = graph.links.len();
            "Graph document parsed"
        );
        Ok(graph)
    }

    /// Compute the settled layout of `graph`.
    ///
    /// # Errors
    ///
    /// Returns [`RelaymapError::Config`] for an invalid color override and
    /// [`RelaymapError::Graph`] if the graph or layout configuration is rejected.
    pub fn compute(&self, graph: &Graph) -> Result<Layout, RelaymapError> {
        let palette = self.config.style().palette().map_err(RelaymapError::Config)?;
        let layout = layout_with_palette(graph, self.config.layout(), &palette)?;
        Ok(layout)
    }

    /// Serialize a layout as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`RelaymapError::Json`] if serialization fails.
    pub fn render_json(&self, layout: &Layout) -> Result<String, RelaymapError> {
        Ok(serde_json::to_string_pretty(layout)?)
    }
}
