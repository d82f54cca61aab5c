//! Degree, path-based and spectral centralities.

use super::adjacency::Adjacency;
use super::paths::dijkstra;

/// Path-based centralities of every node.
#[derive(Debug, Clone, Default)]
pub(crate) struct PathCentrality {
    pub(crate) betweenness: Vec<f64>,
    pub(crate) closeness: Vec<f64>,
    pub(crate) harmonic: Vec<f64>,
}

/// `degree / (n - 1)`; zero for graphs below two nodes.
pub(crate) fn degree_centrality(adj: &Adjacency) -> Vec<f64> {
    let n = adj.len();
    if n < 2 {
        return vec![0.0; n];
    }
    (0..n)
        .map(|i| adj.degree(i) as f64 / (n - 1) as f64)
        .collect()
}

/// Brandes betweenness plus closeness and harmonic centrality, sharing one
/// Dijkstra run per source.
pub(crate) fn path_centrality(adj: &Adjacency) -> PathCentrality {
    let n = adj.len();
    let mut betweenness = vec![0.0; n];
    let mut closeness = vec![0.0; n];
    let mut harmonic = vec![0.0; n];

    for s in 0..n {
        let paths = dijkstra(adj, s);

        // Dependency accumulation in reverse settle order.
        let mut delta = vec![0.0; n];
        for &w in paths.order.iter().rev() {
            let coeff = (1.0 + delta[w]) / paths.sigma[w];
            for &v in &paths.preds[w] {
                delta[v] += paths.sigma[v] * coeff;
            }
            if w != s {
                betweenness[w] += delta[w];
            }
        }

        let mut reached = 0usize;
        let mut total = 0.0;
        let mut inverse = 0.0;
        for (v, &d) in paths.dist.iter().enumerate() {
            let Some(d) = d else { continue };
            if v == s {
                continue;
            }
            reached += 1;
            total += d;
            inverse += 1.0 / d;
        }
        if n > 1 {
            if total > 0.0 {
                let r = reached as f64;
                closeness[s] = (r / total) * (r / (n - 1) as f64);
            }
            harmonic[s] = inverse / (n - 1) as f64;
        }
    }

    // Every pair is counted from both ends.
    if n > 2 {
        let scale = 1.0 / ((n - 1) * (n - 2)) as f64;
        for b in &mut betweenness {
            *b *= scale;
        }
    } else {
        betweenness.iter_mut().for_each(|b| *b = 0.0);
    }

    PathCentrality {
        betweenness,
        closeness,
        harmonic,
    }
}

/// Weighted PageRank by power iteration.
///
/// Returns the scores and whether the iteration converged within `max_iter`.
pub(crate) fn pagerank(
    adj: &Adjacency,
    damping: f64,
    max_iter: usize,
    tolerance: f64,
) -> (Vec<f64>, bool) {
    let n = adj.len();
    if n == 0 {
        return (Vec::new(), true);
    }
    let nf = n as f64;
    let strength: Vec<f64> = (0..n).map(|i| adj.strength(i)).collect();
    let mut x = vec![1.0 / nf; n];

    for _ in 0..max_iter {
        let last = x.clone();
        let dangling: f64 = (0..n)
            .filter(|&i| strength[i] == 0.0)
            .map(|i| last[i])
            .sum();
        let base = (1.0 - damping) / nf + damping * dangling / nf;
        x.iter_mut().for_each(|v| *v = base);

        for (u, list) in adj.neighbors.iter().enumerate() {
            if strength[u] == 0.0 {
                continue;
            }
            let share = damping * last[u] / strength[u];
            for &(v, w) in list {
                x[v] += share * w;
            }
        }

        let err: f64 = x.iter().zip(&last).map(|(a, b)| (a - b).abs()).sum();
        if err < nf * tolerance {
            return (x, true);
        }
    }
    (x, false)
}

/// Weighted eigenvector centrality, L2-normalized.
///
/// Iterates `x ← (A + I) x` from a uniform start; the identity shift keeps
/// bipartite graphs from oscillating without changing the eigenvector.
pub(crate) fn eigenvector(adj: &Adjacency, max_iter: usize, tolerance: f64) -> (Vec<f64>, bool) {
    let n = adj.len();
    if n == 0 {
        return (Vec::new(), true);
    }
    let nf = n as f64;
    let mut x = vec![1.0 / nf; n];

    for _ in 0..max_iter {
        let last = x.clone();
        for (u, list) in adj.neighbors.iter().enumerate() {
            for &(v, w) in list {
                x[v] += last[u] * w;
            }
        }
        scale_to_unit(&mut x);

        let err: f64 = x.iter().zip(&last).map(|(a, b)| (a - b).abs()).sum();
        if err < nf * tolerance {
            return (x, true);
        }
    }
    (x, false)
}

/// Unweighted Katz centrality with `beta = 1`, L2-normalized.
///
/// Diverges when `alpha` is not below the inverse of the largest adjacency
/// eigenvalue; the caller then gets `false` and should not trust the scores.
pub(crate) fn katz(
    adj: &Adjacency,
    alpha: f64,
    max_iter: usize,
    tolerance: f64,
) -> (Vec<f64>, bool) {
    let n = adj.len();
    if n == 0 {
        return (Vec::new(), true);
    }
    let nf = n as f64;
    let mut x = vec![0.0; n];

    for _ in 0..max_iter {
        let last = x.clone();
        for (u, list) in adj.neighbors.iter().enumerate() {
            x[u] = alpha * list.iter().map(|&(v, _)| last[v]).sum::<f64>() + 1.0;
        }

        let err: f64 = x.iter().zip(&last).map(|(a, b)| (a - b).abs()).sum();
        if !err.is_finite() {
            break;
        }
        if err < nf * tolerance {
            scale_to_unit(&mut x);
            return (x, true);
        }
    }
    (x, false)
}

fn scale_to_unit(x: &mut [f64]) {
    let norm = x.iter().map(|v| v * v).sum::<f64>().sqrt();
    if norm > 0.0 {
        x.iter_mut().for_each(|v| *v /= norm);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(n: usize) -> Adjacency {
        let mut neighbors = vec![Vec::new(); n];
        for i in 1..n {
            neighbors[i - 1].push((i, 1.0));
            neighbors[i].push((i - 1, 1.0));
        }
        for list in &mut neighbors {
            list.sort_by_key(|&(j, _)| j);
        }
        Adjacency { neighbors }
    }

    #[test]
    fn eigenvector_of_a_path() {
        let (x, converged) = eigenvector(&path(3), 1000, 1e-9);
        assert!(converged);
        assert!((x[1] - 0.5f64.sqrt()).abs() < 1e-6);
        assert!((x[0] - 0.5).abs() < 1e-6);
        assert!((x[0] - x[2]).abs() < 1e-12);
    }

    #[test]
    fn katz_of_a_path() {
        let (x, converged) = katz(&path(3), 0.1, 1000, 1e-9);
        assert!(converged);
        // x_a = 1.1 / 0.98, x_b = 0.2 x_a + 1, then unit length.
        let a: f64 = 1.1 / 0.98;
        let b = 0.2 * a + 1.0;
        let norm = (2.0 * a * a + b * b).sqrt();
        assert!((x[0] - a / norm).abs() < 1e-6);
        assert!((x[1] - b / norm).abs() < 1e-6);
    }

    #[test]
    fn katz_reports_divergence() {
        // Star with 200 leaves: largest eigenvalue ~14 > 1 / 0.1.
        let mut neighbors = vec![Vec::new(); 201];
        for leaf in 1..=200 {
            neighbors[0].push((leaf, 1.0));
            neighbors[leaf].push((0, 1.0));
        }
        let (_, converged) = katz(&Adjacency { neighbors }, 0.1, 1000, 1e-6);
        assert!(!converged);
    }
}
