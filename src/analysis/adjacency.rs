use petgraph::visit::EdgeRef;

use crate::graph::InteractionGraph;

/// Dense weighted adjacency lists indexed like the graph's nodes.
///
/// Neighbour lists are sorted by index so every traversal is reproducible.
#[derive(Debug, Clone)]
pub(crate) struct Adjacency {
    pub(crate) neighbors: Vec<Vec<(usize, f64)>>,
}

impl Adjacency {
    pub(crate) fn new(graph: &InteractionGraph) -> Self {
        let inner = graph.inner();
        let mut neighbors = vec![Vec::new(); inner.node_count()];
        for e in inner.edge_references() {
            let (a, b) = (e.source().index(), e.target().index());
            let w = e.weight().weight;
            neighbors[a].push((b, w));
            neighbors[b].push((a, w));
        }
        for list in &mut neighbors {
            list.sort_by_key(|&(j, _)| j);
        }
        Self { neighbors }
    }

    pub(crate) fn len(&self) -> usize {
        self.neighbors.len()
    }

    pub(crate) fn degree(&self, i: usize) -> usize {
        self.neighbors[i].len()
    }

    pub(crate) fn strength(&self, i: usize) -> f64 {
        self.neighbors[i].iter().map(|&(_, w)| w).sum()
    }

    pub(crate) fn has_edge(&self, i: usize, j: usize) -> bool {
        self.neighbors[i]
            .binary_search_by_key(&j, |&(k, _)| k)
            .is_ok()
    }

    /// Twice the total edge weight.
    pub(crate) fn double_weight(&self) -> f64 {
        (0..self.len()).map(|i| self.strength(i)).sum()
    }
}
