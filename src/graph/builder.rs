//! Graph construction logic: from interaction events into an InteractionGraph.

use std::collections::{BTreeMap, BTreeSet};

use petgraph::graph::UnGraph;

use crate::{
    errors::{CharnetError, Result},
    extract::InteractionEvent,
    graph::{CharacterNode, InteractionEdge, InteractionGraph, PairAccumulator},
    registry::CharacterRegistry,
};

/// Builder for InteractionGraph from extracted events.
#[derive(Debug)]
pub struct InteractionGraphBuilder<'r> {
    registry: &'r CharacterRegistry,
    stats: PairAccumulator,
}

impl<'r> InteractionGraphBuilder<'r> {
    /// Create a new builder over the registry that issued the events' keys.
    pub fn new(registry: &'r CharacterRegistry) -> Self {
        Self {
            registry,
            stats: PairAccumulator::new(),
        }
    }

    /// Ingest events, in any order.
    pub fn ingest<'e>(&mut self, events: impl IntoIterator<Item = &'e InteractionEvent>) {
        for event in events {
            self.stats.add_event(event);
        }
    }

    /// Ingest pre-accumulated statistics, such as one chapter's.
    pub fn ingest_stats(&mut self, stats: PairAccumulator) {
        self.stats.merge(stats);
    }

    /// Finalize the graph construction.
    pub fn finalize(self) -> Result<InteractionGraph> {
        tracing::debug!("aggregating {} interacting pairs", self.stats.pair_count());
        let edges = self.stats.into_edges();

        let keys: BTreeSet<_> = edges
            .iter()
            .flat_map(|(pair, _)| [pair.low(), pair.high()])
            .collect();

        let mut graph: UnGraph<CharacterNode, InteractionEdge> =
            UnGraph::with_capacity(keys.len(), edges.len());
        let mut index = BTreeMap::new();

        // 1. Nodes, in canonical id order
        for key in keys {
            let character = self
                .registry
                .get(key)
                .ok_or(CharnetError::UnknownCharacter(key.index()))?;
            let idx = graph.add_node(CharacterNode::new(character));
            index.insert(key, idx);
        }

        // 2. Edges, in canonical pair order
        for (pair, edge) in edges {
            graph.add_edge(index[&pair.low()], index[&pair.high()], edge);
        }

        tracing::info!(
            "interaction graph: {} nodes, {} edges",
            graph.node_count(),
            graph.edge_count()
        );

        Ok(InteractionGraph { inner: graph, index })
    }
}

/// Aggregate events into a frozen graph.
pub fn build(registry: &CharacterRegistry, events: &[InteractionEvent]) -> Result<InteractionGraph> {
    let mut builder = InteractionGraphBuilder::new(registry);
    builder.ingest(events);
    builder.finalize()
}
