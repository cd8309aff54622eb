//! Stale-result tagging for layouts computed off the caller's thread.
//!
//! A layout run cannot be cancelled: once started it always performs its full
//! tick budget. Callers that recompute layouts as new graphs arrive therefore
//! tag every run with a [`Generation`] and drop results whose tag is no longer
//! the latest.
//!
//! ```
//! # use relaymap::{config::LayoutConfig, config::Palette, generation::Generations, graph::Graph};
//! let generations = Generations::new();
//! let stale = generations.spawn_layout(Graph::default(), LayoutConfig::default(), Palette::default());
//! let fresh = generations.spawn_layout(Graph::default(), LayoutConfig::default(), Palette::default());
//!
//! assert!(stale.join().into_current(&generations).is_none());
//! assert!(fresh.join().into_current(&generations).is_some());
//! ```

use std::{
    panic,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    thread::{self, JoinHandle},
};

use log::debug;

use crate::{
    config::{LayoutConfig, Palette},
    error::GraphError,
    graph::Graph,
    layout::Layout,
    layout_with_palette,
};

/// Monotonically increasing tag of one layout request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Generation(u64);

impl Generation {
    /// Returns the raw counter value
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Shared generation counter.
///
/// Cloning shares the counter, so a clone can be handed to whichever thread
/// receives new graphs while another thread checks results against it.
#[derive(Debug, Clone, Default)]
pub struct Generations {
    latest: Arc<AtomicU64>,
}

impl Generations {
    /// Creates a counter; no generation has been issued yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a new generation, making every earlier one stale.
    pub fn next(&self) -> Generation {
        Generation(self.latest.fetch_add(1, Ordering::AcqRel) + 1)
    }

    /// Returns the most recently issued generation
    pub fn latest(&self) -> Generation {
        Generation(self.latest.load(Ordering::Acquire))
    }

    /// Returns true if no newer generation has been issued since `generation`
    pub fn is_latest(&self, generation: Generation) -> bool {
        self.latest() == generation
    }

    /// Issues a new generation and computes the layout on a background thread.
    pub fn spawn_layout(&self, graph: Graph, config: LayoutConfig, palette: Palette) -> LayoutTask {
        let generation = self.next();
        debug!(
            generation = generation.value(),
            node_count = graph.nodes.len();
            "Spawning background layout"
        );
        let handle = thread::spawn(move || layout_with_palette(&graph, &config, &palette));
        LayoutTask { generation, handle }
    }
}

/// A value together with the generation it was computed for.
#[derive(Debug, Clone, PartialEq)]
pub struct Tagged<T> {
    pub generation: Generation,
    pub value: T,
}

impl<T> Tagged<T> {
    /// Returns the value if its generation is still the latest, dropping it otherwise.
    pub fn into_current(self, generations: &Generations) -> Option<T> {
        if generations.is_latest(self.generation) {
            Some(self.value)
        } else {
            debug!(generation = self.generation.value(); "Discarding stale layout result");
            None
        }
    }
}

/// Handle to a layout running on a background thread.
#[derive(Debug)]
pub struct LayoutTask {
    generation: Generation,
    handle: JoinHandle<Result<Layout, GraphError>>,
}

impl LayoutTask {
    /// Generation this task was issued
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Blocks until the layout is ready.
    ///
    /// A panic on the layout thread is resumed on the caller's thread.
    pub fn join(self) -> Tagged<Result<Layout, GraphError>> {
        let value = match self.handle.join() {
            Ok(result) => result,
            Err(payload) => panic::resume_unwind(payload),
        };
        Tagged {
            generation: self.generation,
            value,
        }
    }
}
