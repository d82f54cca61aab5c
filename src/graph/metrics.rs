//! Graph-level size and density figures.

use crate::graph::InteractionGraph;

/// Summary metrics for health-checking the graph.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GraphMetrics {
    /// Total number of nodes.
    pub num_nodes: usize,
    /// Total number of edges.
    pub num_edges: usize,
    /// Edges over possible pairs; 0 below two nodes.
    pub density: f64,
    /// Average degree of the graph.
    pub avg_degree: f64,
    /// Sum of edge weights.
    pub total_weight: f64,
}

impl GraphMetrics {
    /// Compute metrics for the given graph.
    pub fn compute(graph: &InteractionGraph) -> Self {
        let num_nodes = graph.node_count();
        let num_edges = graph.edge_count();

        let avg_degree = if num_nodes > 0 {
            (2 * num_edges) as f64 / num_nodes as f64
        } else {
            0.0
        };
        let density = if num_nodes > 1 {
            (2 * num_edges) as f64 / (num_nodes * (num_nodes - 1)) as f64
        } else {
            0.0
        };

        Self {
            num_nodes,
            num_edges,
            density,
            avg_degree,
            total_weight: graph.total_weight(),
        }
    }
}
