//! Interaction graph: character nodes, aggregated edges, summary metrics.

use std::collections::BTreeMap;

use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;

use crate::types::CharacterKey;

pub mod builder;
pub mod edge;
pub mod metrics;
pub mod node;
/// Per-pair event accumulation.
pub mod stats;

pub use builder::{build, InteractionGraphBuilder};
pub use edge::{EdgeRecord, InteractionEdge};
pub use metrics::GraphMetrics;
pub use node::CharacterNode;
pub use stats::{PairAccumulator, MAX_EDGE_CONTEXTS};

/// Frozen, weighted, undirected simple graph of character interactions.
///
/// Node indices follow canonical id order and edge indices follow canonical
/// pair order, so iteration order is reproducible. There is no mutable access
/// once the builder hands the graph over.
#[derive(Debug, Clone)]
pub struct InteractionGraph {
    inner: UnGraph<CharacterNode, InteractionEdge>,
    index: BTreeMap<CharacterKey, NodeIndex>,
}

impl InteractionGraph {
    /// Access the underlying petgraph graph (for advanced operations).
    pub fn inner(&self) -> &UnGraph<CharacterNode, InteractionEdge> {
        &self.inner
    }

    /// Number of characters.
    pub fn node_count(&self) -> usize {
        self.inner.node_count()
    }

    /// Number of interacting pairs.
    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }

    /// Whether the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.inner.node_count() == 0
    }

    /// Petgraph index of a character.
    pub fn node_index(&self, key: CharacterKey) -> Option<NodeIndex> {
        self.index.get(&key).copied()
    }

    /// Node of a character, if it interacts with anyone.
    pub fn node(&self, key: CharacterKey) -> Option<&CharacterNode> {
        self.node_index(key).map(|idx| &self.inner[idx])
    }

    /// Nodes in canonical id order.
    pub fn nodes(&self) -> impl Iterator<Item = &CharacterNode> {
        self.inner.node_indices().map(move |idx| &self.inner[idx])
    }

    /// Edge between two characters.
    pub fn edge(&self, a: CharacterKey, b: CharacterKey) -> Option<&InteractionEdge> {
        let e = self.inner.find_edge(self.node_index(a)?, self.node_index(b)?)?;
        Some(&self.inner[e])
    }

    /// Edges as `(low, high, edge)` in canonical pair order.
    pub fn edges(&self) -> impl Iterator<Item = (&CharacterNode, &CharacterNode, &InteractionEdge)> {
        self.inner.edge_references().map(move |e| {
            let (a, b) = (&self.inner[e.source()], &self.inner[e.target()]);
            if a.key < b.key {
                (a, b, e.weight())
            } else {
                (b, a, e.weight())
            }
        })
    }

    /// Neighbours of a character with the connecting edge.
    pub fn neighbors(&self, key: CharacterKey) -> Vec<(&CharacterNode, &InteractionEdge)> {
        let Some(idx) = self.node_index(key) else {
            return Vec::new();
        };
        let mut out: Vec<_> = self
            .inner
            .edges(idx)
            .map(|e| {
                let other = if e.source() == idx { e.target() } else { e.source() };
                (&self.inner[other], e.weight())
            })
            .collect();
        out.sort_by_key(|(node, _)| node.key);
        out
    }

    /// Number of neighbours.
    pub fn degree(&self, key: CharacterKey) -> Option<usize> {
        self.node_index(key).map(|idx| self.inner.edges(idx).count())
    }

    /// Sum of edge weights.
    pub fn total_weight(&self) -> f64 {
        self.inner.edge_weights().map(|e| e.weight).sum()
    }

    /// Rows for `interactions.json`.
    pub fn edge_records(&self) -> Vec<EdgeRecord> {
        self.edges()
            .map(|(a, b, e)| EdgeRecord {
                character_a: a.id.clone(),
                character_b: b.id.clone(),
                weight: e.weight,
                segment_count: e.segment_count,
                event_count: e.event_count,
                dialogue_events: e.dialogue_events,
                action_events: e.action_events,
                co_occurrence_events: e.co_occurrence_events,
                chapters: e.chapters.clone(),
                contexts: e.contexts.clone(),
            })
            .collect()
    }
}
