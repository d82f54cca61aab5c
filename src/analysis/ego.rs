use serde::{Deserialize, Serialize};

use crate::{
    analysis::{CharacterMetrics, MetricsReport},
    graph::InteractionGraph,
    types::CharacterKey,
};

/// One neighbour of the focal character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Neighbor {
    /// Canonical id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Interaction weight with the focal character.
    pub weight: f64,
    /// Shared segments.
    pub segment_count: usize,
    /// Dialogue events between the two.
    pub dialogue_events: usize,
    /// Action events between the two.
    pub action_events: usize,
    /// Earliest passage where the two interact.
    pub context: Option<String>,
    /// Neighbour's community.
    pub community: Option<usize>,
}

/// A single character's metrics and strongest relationships.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FocalView {
    /// The focal character's metrics.
    pub character: CharacterMetrics,
    /// Neighbours by descending weight, ties by id.
    pub neighbors: Vec<Neighbor>,
}

impl FocalView {
    /// `None` if the character has no interactions.
    pub fn new(graph: &InteractionGraph, report: &MetricsReport, key: CharacterKey) -> Option<Self> {
        let node = graph.node(key)?;
        let character = report.character(&node.id)?.clone();

        let mut neighbors: Vec<Neighbor> = graph
            .neighbors(key)
            .into_iter()
            .map(|(other, edge)| Neighbor {
                id: other.id.clone(),
                name: other.name.clone(),
                weight: edge.weight,
                segment_count: edge.segment_count,
                dialogue_events: edge.dialogue_events,
                action_events: edge.action_events,
                context: edge.contexts.first().cloned(),
                community: report.community_of(&other.id),
            })
            .collect();
        neighbors.sort_by(|a, b| b.weight.total_cmp(&a.weight).then_with(|| a.id.cmp(&b.id)));

        Some(Self { character, neighbors })
    }

    /// The `n` strongest neighbours.
    pub fn top(&self, n: usize) -> &[Neighbor] {
        &self.neighbors[..n.min(self.neighbors.len())]
    }
}
