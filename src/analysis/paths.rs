//! Single-source shortest paths with cost = 1 / weight.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use super::adjacency::Adjacency;

/// Relative tolerance under which two path lengths count as equal.
const PATH_EPSILON: f64 = 1e-9;

fn same_length(a: f64, b: f64) -> bool {
    (a - b).abs() <= PATH_EPSILON * a.abs().max(b.abs())
}

#[derive(Debug, Clone, Copy)]
struct Frontier {
    cost: f64,
    node: usize,
}

impl PartialEq for Frontier {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Frontier {}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Frontier {
    // Min-heap on cost, then on node index.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.node.cmp(&self.node))
    }
}

/// Shortest-path DAG from one source.
#[derive(Debug, Clone)]
pub(crate) struct ShortestPaths {
    /// Distance to each node; `None` when unreachable.
    pub(crate) dist: Vec<Option<f64>>,
    /// Number of shortest paths from the source.
    pub(crate) sigma: Vec<f64>,
    /// Predecessors on shortest paths.
    pub(crate) preds: Vec<Vec<usize>>,
    /// Settled nodes in non-decreasing distance.
    pub(crate) order: Vec<usize>,
}

pub(crate) fn dijkstra(adj: &Adjacency, source: usize) -> ShortestPaths {
    let n = adj.len();
    let mut dist: Vec<Option<f64>> = vec![None; n];
    let mut sigma = vec![0.0; n];
    let mut preds: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut settled = vec![false; n];
    let mut order = Vec::with_capacity(n);
    let mut heap = BinaryHeap::new();

    dist[source] = Some(0.0);
    sigma[source] = 1.0;
    heap.push(Frontier { cost: 0.0, node: source });

    while let Some(Frontier { cost, node: v }) = heap.pop() {
        if settled[v] {
            continue;
        }
        settled[v] = true;
        order.push(v);

        for &(w, weight) in &adj.neighbors[v] {
            if settled[w] {
                continue;
            }
            let candidate = cost + 1.0 / weight;
            match dist[w] {
                Some(d) if same_length(candidate, d) => {
                    sigma[w] += sigma[v];
                    preds[w].push(v);
                }
                Some(d) if candidate > d => {}
                _ => {
                    dist[w] = Some(candidate);
                    sigma[w] = sigma[v];
                    preds[w].clear();
                    preds[w].push(v);
                    heap.push(Frontier { cost: candidate, node: w });
                }
            }
        }
    }

    ShortestPaths {
        dist,
        sigma,
        preds,
        order,
    }
}
