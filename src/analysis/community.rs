//! Louvain modularity optimisation with a fixed visiting order.

use std::collections::BTreeMap;

use super::adjacency::Adjacency;
use crate::config::MetricsConfig;

/// Community assignment of every node.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Partition {
    /// Community id per node, numbered by first member.
    pub(crate) membership: Vec<usize>,
    /// Number of communities.
    pub(crate) count: usize,
    /// Modularity of the partition at the configured resolution.
    pub(crate) modularity: f64,
}

impl Partition {
    fn singletons(n: usize) -> Self {
        Self {
            membership: (0..n).collect(),
            count: n,
            modularity: 0.0,
        }
    }
}

/// Weighted graph at one aggregation level; `loops[i]` is `A_ii`.
#[derive(Debug, Clone)]
struct Level {
    neighbors: Vec<Vec<(usize, f64)>>,
    loops: Vec<f64>,
}

impl Level {
    fn new(adj: &Adjacency) -> Self {
        Self {
            neighbors: adj.neighbors.clone(),
            loops: vec![0.0; adj.len()],
        }
    }

    fn len(&self) -> usize {
        self.neighbors.len()
    }

    fn strength(&self, i: usize) -> f64 {
        self.loops[i] + self.neighbors[i].iter().map(|&(_, w)| w).sum::<f64>()
    }

    /// Collapse each community into one node.
    fn aggregate(&self, membership: &[usize], count: usize) -> Self {
        let mut links: Vec<BTreeMap<usize, f64>> = vec![BTreeMap::new(); count];
        let mut loops = vec![0.0; count];

        for (i, list) in self.neighbors.iter().enumerate() {
            let ci = membership[i];
            loops[ci] += self.loops[i];
            for &(j, w) in list {
                let cj = membership[j];
                if ci == cj {
                    // Seen from both endpoints: A_cc = 2 * internal weight.
                    loops[ci] += w;
                } else {
                    *links[ci].entry(cj).or_insert(0.0) += w;
                }
            }
        }

        Self {
            neighbors: links.into_iter().map(|m| m.into_iter().collect()).collect(),
            loops,
        }
    }
}

/// Relabel communities by first appearance; returns the community count.
fn renumber(membership: &mut [usize]) -> usize {
    let mut mapping: BTreeMap<usize, usize> = BTreeMap::new();
    for c in membership.iter_mut() {
        let next = mapping.len();
        *c = *mapping.entry(*c).or_insert(next);
    }
    mapping.len()
}

/// Local moving phase. Returns the level partition and whether any node moved.
fn local_moving(level: &Level, m2: f64, config: &MetricsConfig) -> (Vec<usize>, usize, bool) {
    let n = level.len();
    let gamma = config.community_resolution;
    let k: Vec<f64> = (0..n).map(|i| level.strength(i)).collect();
    let mut membership: Vec<usize> = (0..n).collect();
    let mut tot = k.clone();
    let mut improved = false;

    for _ in 0..config.max_community_passes {
        let mut moved = false;

        for i in 0..n {
            let current = membership[i];
            let mut weights: BTreeMap<usize, f64> = BTreeMap::new();
            weights.insert(current, 0.0);
            for &(j, w) in &level.neighbors[i] {
                *weights.entry(membership[j]).or_insert(0.0) += w;
            }

            tot[current] -= k[i];
            let gain = |c: usize, w_ic: f64| w_ic - gamma * tot[c] * k[i] / m2;

            let mut best = current;
            let mut best_gain = gain(current, weights[&current]);
            for (&c, &w_ic) in &weights {
                if c == current {
                    continue;
                }
                let g = gain(c, w_ic);
                if g > best_gain + config.min_modularity_gain {
                    best = c;
                    best_gain = g;
                }
            }

            tot[best] += k[i];
            if best != current {
                membership[i] = best;
                moved = true;
                improved = true;
            }
        }

        if !moved {
            break;
        }
    }

    let count = renumber(&mut membership);
    (membership, count, improved)
}

/// Modularity `Σ_c [in_c / 2m − γ (tot_c / 2m)²]`.
pub(crate) fn modularity(adj: &Adjacency, membership: &[usize], count: usize, gamma: f64) -> f64 {
    let m2 = adj.double_weight();
    if m2 == 0.0 {
        return 0.0;
    }
    let mut internal = vec![0.0; count];
    let mut total = vec![0.0; count];
    for (i, list) in adj.neighbors.iter().enumerate() {
        let ci = membership[i];
        for &(j, w) in list {
            total[ci] += w;
            if membership[j] == ci {
                internal[ci] += w;
            }
        }
    }
    internal
        .iter()
        .zip(&total)
        .map(|(&inside, &tot)| inside / m2 - gamma * (tot / m2) * (tot / m2))
        .sum()
}

/// Multi-level Louvain.
pub(crate) fn louvain(adj: &Adjacency, config: &MetricsConfig) -> Partition {
    let n = adj.len();
    let m2 = adj.double_weight();
    if m2 == 0.0 {
        return Partition::singletons(n);
    }

    let mut level = Level::new(adj);
    let mut membership: Vec<usize> = (0..n).collect();
    let mut levels = 0;

    loop {
        let (local, count, improved) = local_moving(&level, m2, config);
        if !improved {
            break;
        }
        levels += 1;
        for c in membership.iter_mut() {
            *c = local[*c];
        }
        if count == level.len() {
            break;
        }
        level = level.aggregate(&local, count);
    }

    let count = renumber(&mut membership);
    let modularity = modularity(adj, &membership, count, config.community_resolution);
    tracing::debug!(
        "louvain: {} communities after {} levels, modularity {:.4}",
        count,
        levels,
        modularity
    );

    Partition {
        membership,
        count,
        modularity,
    }
}
