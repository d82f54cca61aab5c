//! Components, clustering, k-cores, brokerage and hop distances.

use std::collections::VecDeque;

use super::adjacency::Adjacency;

/// Component id per node, numbered by each component's lowest node index.
pub(crate) fn components(adj: &Adjacency) -> (Vec<usize>, usize) {
    let n = adj.len();
    let mut component = vec![usize::MAX; n];
    let mut count = 0;

    for start in 0..n {
        if component[start] != usize::MAX {
            continue;
        }
        component[start] = count;
        let mut queue = VecDeque::from([start]);
        while let Some(v) = queue.pop_front() {
            for &(w, _) in &adj.neighbors[v] {
                if component[w] == usize::MAX {
                    component[w] = count;
                    queue.push_back(w);
                }
            }
        }
        count += 1;
    }
    (component, count)
}

/// Triangles through each node.
fn triangles(adj: &Adjacency) -> Vec<usize> {
    (0..adj.len())
        .map(|u| {
            let list = &adj.neighbors[u];
            let mut t = 0;
            for (i, &(a, _)) in list.iter().enumerate() {
                for &(b, _) in &list[i + 1..] {
                    if adj.has_edge(a, b) {
                        t += 1;
                    }
                }
            }
            t
        })
        .collect()
}

/// Unweighted local clustering and global transitivity.
pub(crate) fn clustering(adj: &Adjacency) -> (Vec<f64>, f64) {
    let tri = triangles(adj);
    let mut local = Vec::with_capacity(adj.len());
    let mut closed = 0usize;
    let mut triads = 0usize;

    for (u, &t) in tri.iter().enumerate() {
        let k = adj.degree(u);
        let possible = k * k.saturating_sub(1) / 2;
        closed += t;
        triads += possible;
        local.push(if possible == 0 { 0.0 } else { t as f64 / possible as f64 });
    }

    let transitivity = if triads == 0 { 0.0 } else { closed as f64 / triads as f64 };
    (local, transitivity)
}

/// k-core number by repeated removal of a minimum-degree node.
pub(crate) fn core_numbers(adj: &Adjacency) -> Vec<usize> {
    let n = adj.len();
    let mut degree: Vec<usize> = (0..n).map(|i| adj.degree(i)).collect();
    let mut removed = vec![false; n];
    let mut core = vec![0; n];
    let mut k = 0;

    for _ in 0..n {
        let Some(v) = (0..n)
            .filter(|&i| !removed[i])
            .min_by_key(|&i| (degree[i], i))
        else {
            break;
        };
        k = k.max(degree[v]);
        core[v] = k;
        removed[v] = true;
        for &(w, _) in &adj.neighbors[v] {
            if !removed[w] {
                degree[w] -= 1;
            }
        }
    }
    core
}

/// Burt's constraint on unweighted ties; 1.0 for a single tie, lower for
/// brokers whose contacts are not linked to each other.
pub(crate) fn constraint(adj: &Adjacency) -> Vec<f64> {
    let share = |i: usize, j: usize| {
        if adj.has_edge(i, j) {
            1.0 / adj.degree(i) as f64
        } else {
            0.0
        }
    };
    (0..adj.len())
        .map(|i| {
            adj.neighbors[i]
                .iter()
                .map(|&(j, _)| {
                    let indirect: f64 = adj.neighbors[i]
                        .iter()
                        .filter(|&&(q, _)| q != j)
                        .map(|&(q, _)| share(i, q) * share(q, j))
                        .sum();
                    let direct = share(i, j) + indirect;
                    direct * direct
                })
                .sum()
        })
        .collect()
}

/// Mean hop count over ordered pairs of distinct nodes; `None` unless the
/// graph is connected and has at least two nodes.
pub(crate) fn average_path_length(adj: &Adjacency) -> Option<f64> {
    let n = adj.len();
    if n < 2 {
        return None;
    }
    let mut total = 0usize;
    for source in 0..n {
        let mut hops = vec![usize::MAX; n];
        hops[source] = 0;
        let mut queue = VecDeque::from([source]);
        let mut reached = 1;
        while let Some(v) = queue.pop_front() {
            for &(w, _) in &adj.neighbors[v] {
                if hops[w] == usize::MAX {
                    hops[w] = hops[v] + 1;
                    total += hops[w];
                    reached += 1;
                    queue.push_back(w);
                }
            }
        }
        if reached < n {
            return None;
        }
    }
    Some(total as f64 / (n * (n - 1)) as f64)
}
