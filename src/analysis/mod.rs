//! Metrics engine: centralities, structure and communities over an
//! [`InteractionGraph`].
//!
//! Path-based metrics treat `1 / weight` as the edge length, so frequent
//! interaction means closeness. All node iteration follows canonical id
//! order, which makes every figure reproducible.

use std::collections::BTreeMap;

use crate::{
    config::MetricsConfig,
    errors::Result,
    graph::{GraphMetrics, InteractionGraph},
};

mod adjacency;
mod centrality;
mod community;
/// Single-character view.
pub mod ego;
mod paths;
/// Report types.
pub mod report;
mod structure;

pub use ego::{FocalView, Neighbor};
pub use report::{CharacterMetrics, CommunitySummary, GraphSummary, MetricsReport, RankingMetric};

use adjacency::Adjacency;

/// Computes a [`MetricsReport`] from a frozen graph.
#[derive(Debug, Clone, Default)]
pub struct MetricsEngine {
    config: MetricsConfig,
}

impl MetricsEngine {
    /// Create an engine; fails on invalid parameters.
    pub fn new(config: MetricsConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Parameters in use.
    pub fn config(&self) -> &MetricsConfig {
        &self.config
    }

    /// Compute every metric. A graph without edges yields zeroed metrics and
    /// singleton communities.
    pub fn analyze(&self, graph: &InteractionGraph) -> MetricsReport {
        if graph.is_empty() {
            return MetricsReport::empty();
        }

        let adj = Adjacency::new(graph);
        let n = adj.len();
        let basics = GraphMetrics::compute(graph);

        let degree_centrality = centrality::degree_centrality(&adj);
        let paths = centrality::path_centrality(&adj);
        let (pagerank, converged) = centrality::pagerank(
            &adj,
            self.config.pagerank_damping,
            self.config.pagerank_max_iter,
            self.config.pagerank_tolerance,
        );
        if !converged {
            tracing::warn!(
                "pagerank did not converge in {} iterations",
                self.config.pagerank_max_iter
            );
        }
        let (eigenvector, converged) = centrality::eigenvector(
            &adj,
            self.config.eigenvector_max_iter,
            self.config.power_tolerance,
        );
        let eigenvector = if converged {
            eigenvector
        } else {
            tracing::warn!(
                "eigenvector centrality did not converge in {} iterations, reporting zeros",
                self.config.eigenvector_max_iter
            );
            vec![0.0; n]
        };
        let (katz, converged) = centrality::katz(
            &adj,
            self.config.katz_alpha,
            self.config.katz_max_iter,
            self.config.power_tolerance,
        );
        let katz = if converged {
            katz
        } else {
            tracing::warn!(
                "katz centrality did not converge (alpha = {}), reporting zeros",
                self.config.katz_alpha
            );
            vec![0.0; n]
        };
        let constraint = structure::constraint(&adj);
        let (component, component_count) = structure::components(&adj);
        let (clustering, transitivity) = structure::clustering(&adj);
        let core = structure::core_numbers(&adj);
        let partition = community::louvain(&adj, &self.config);

        let nodes: Vec<_> = graph.nodes().collect();
        let mut characters: Vec<CharacterMetrics> = (0..n)
            .map(|i| CharacterMetrics {
                rank: 0,
                id: nodes[i].id.clone(),
                name: nodes[i].name.clone(),
                affiliation: nodes[i].affiliation.clone(),
                degree: adj.degree(i),
                weighted_degree: adj.strength(i),
                degree_centrality: degree_centrality[i],
                betweenness: paths.betweenness[i],
                closeness: paths.closeness[i],
                harmonic: paths.harmonic[i],
                pagerank: pagerank[i],
                eigenvector: eigenvector[i],
                katz: katz[i],
                clustering: clustering[i],
                constraint: constraint[i],
                core_number: core[i],
                component: component[i],
                community: partition.membership[i],
            })
            .collect();

        let community_summaries = summarize_communities(&adj, &characters, partition.count);
        let communities: BTreeMap<String, usize> = characters
            .iter()
            .map(|c| (c.id.clone(), c.community))
            .collect();

        characters.sort_by(|a, b| {
            b.weighted_degree
                .total_cmp(&a.weighted_degree)
                .then(b.degree.cmp(&a.degree))
                .then_with(|| a.id.cmp(&b.id))
        });
        for (i, c) in characters.iter_mut().enumerate() {
            c.rank = i + 1;
        }

        let summary = GraphSummary {
            node_count: basics.num_nodes,
            edge_count: basics.num_edges,
            density: basics.density,
            average_degree: basics.avg_degree,
            total_weight: basics.total_weight,
            component_count,
            transitivity,
            average_clustering: clustering.iter().sum::<f64>() / n as f64,
            average_path_length: if component_count == 1 {
                structure::average_path_length(&adj)
            } else {
                None
            },
            modularity: partition.modularity,
            community_count: partition.count,
        };

        tracing::info!(
            "metrics: {} characters, {} components, {} communities (Q = {:.4})",
            n,
            component_count,
            partition.count,
            partition.modularity
        );

        MetricsReport {
            summary,
            characters,
            communities,
            community_summaries,
        }
    }
}

/// Analyze with default parameters.
pub fn analyze(graph: &InteractionGraph) -> MetricsReport {
    MetricsEngine::default().analyze(graph)
}

/// `characters` must still be in node-index order.
fn summarize_communities(
    adj: &Adjacency,
    characters: &[CharacterMetrics],
    count: usize,
) -> Vec<CommunitySummary> {
    let mut summaries: Vec<CommunitySummary> = (0..count)
        .map(|id| CommunitySummary {
            id,
            members: Vec::new(),
            internal_weight: 0.0,
            total_weight: 0.0,
            hub: String::new(),
        })
        .collect();
    let mut hub_strength = vec![f64::NEG_INFINITY; count];

    for (i, c) in characters.iter().enumerate() {
        let s = &mut summaries[c.community];
        s.members.push(c.id.clone());
        s.total_weight += c.weighted_degree;
        // Strictly greater keeps the lowest id on ties.
        if c.weighted_degree > hub_strength[c.community] {
            hub_strength[c.community] = c.weighted_degree;
            s.hub = c.id.clone();
        }
        for &(j, w) in &adj.neighbors[i] {
            if j > i && characters[j].community == c.community {
                s.internal_weight += w;
            }
        }
    }
    summaries
}
