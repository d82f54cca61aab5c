//! Serializable metrics report.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Graph-wide statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphSummary {
    /// Characters with at least one interaction.
    pub node_count: usize,
    /// Interacting pairs.
    pub edge_count: usize,
    /// Edges over possible pairs.
    pub density: f64,
    /// Mean number of neighbours.
    pub average_degree: f64,
    /// Sum of edge weights.
    pub total_weight: f64,
    /// Connected components.
    pub component_count: usize,
    /// Closed over connected triples.
    pub transitivity: f64,
    /// Mean local clustering coefficient.
    pub average_clustering: f64,
    /// Mean hop count between characters; absent when the graph is not connected.
    #[serde(default)]
    pub average_path_length: Option<f64>,
    /// Modularity of the community partition.
    pub modularity: f64,
    /// Number of communities.
    pub community_count: usize,
}

/// Per-character metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterMetrics {
    /// 1-based position by weighted degree, degree, then id.
    pub rank: usize,
    /// Canonical id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Household / faction, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affiliation: Option<String>,
    /// Number of neighbours.
    pub degree: usize,
    /// Sum of incident edge weights.
    pub weighted_degree: f64,
    /// `degree / (n - 1)`.
    pub degree_centrality: f64,
    /// Normalized weighted betweenness.
    pub betweenness: f64,
    /// Wasserman–Faust closeness.
    pub closeness: f64,
    /// Normalized harmonic centrality.
    pub harmonic: f64,
    /// Weighted PageRank.
    pub pagerank: f64,
    /// Weighted eigenvector centrality.
    pub eigenvector: f64,
    /// Katz centrality; zero when the iteration diverges.
    pub katz: f64,
    /// Local clustering coefficient.
    pub clustering: f64,
    /// Burt's structural-hole constraint; low for brokers.
    pub constraint: f64,
    /// k-core number.
    pub core_number: usize,
    /// Connected component id.
    pub component: usize,
    /// Community id.
    pub community: usize,
}

/// One detected community.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommunitySummary {
    /// Community id.
    pub id: usize,
    /// Member ids in canonical order.
    pub members: Vec<String>,
    /// Sum of weights of edges inside the community.
    pub internal_weight: f64,
    /// Sum of members' weighted degrees.
    pub total_weight: f64,
    /// Member with the largest weighted degree.
    pub hub: String,
}

/// Full output of the metrics engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsReport {
    /// Graph-wide statistics.
    pub summary: GraphSummary,
    /// Per-character metrics, ranked.
    pub characters: Vec<CharacterMetrics>,
    /// Canonical id → community id.
    pub communities: BTreeMap<String, usize>,
    /// Communities in id order.
    pub community_summaries: Vec<CommunitySummary>,
}

impl MetricsReport {
    /// Report for a graph without nodes.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Metrics of one character.
    pub fn character(&self, id: &str) -> Option<&CharacterMetrics> {
        self.characters.iter().find(|c| c.id == id)
    }

    /// Community of one character.
    pub fn community_of(&self, id: &str) -> Option<usize> {
        self.communities.get(id).copied()
    }

    /// Characters ordered by `metric`, descending, ties by id.
    pub fn ranked_by(&self, metric: RankingMetric) -> Vec<&CharacterMetrics> {
        let mut out: Vec<&CharacterMetrics> = self.characters.iter().collect();
        out.sort_by(|a, b| {
            metric
                .value(b)
                .total_cmp(&metric.value(a))
                .then_with(|| a.id.cmp(&b.id))
        });
        out
    }
}

/// Metric a ranking can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingMetric {
    /// Number of neighbours.
    Degree,
    /// Sum of incident weights.
    WeightedDegree,
    /// Normalized degree.
    DegreeCentrality,
    /// Weighted betweenness.
    Betweenness,
    /// Weighted closeness.
    Closeness,
    /// Harmonic centrality.
    Harmonic,
    /// Weighted PageRank.
    #[serde(rename = "pagerank")]
    PageRank,
    /// Eigenvector centrality.
    Eigenvector,
    /// Katz centrality.
    Katz,
    /// Local clustering.
    Clustering,
    /// Structural-hole constraint.
    Constraint,
    /// k-core number.
    CoreNumber,
}

impl RankingMetric {
    /// Every metric, in display order.
    pub const ALL: [RankingMetric; 12] = [
        RankingMetric::Degree,
        RankingMetric::WeightedDegree,
        RankingMetric::DegreeCentrality,
        RankingMetric::Betweenness,
        RankingMetric::Closeness,
        RankingMetric::Harmonic,
        RankingMetric::PageRank,
        RankingMetric::Eigenvector,
        RankingMetric::Katz,
        RankingMetric::Clustering,
        RankingMetric::Constraint,
        RankingMetric::CoreNumber,
    ];

    /// Value of this metric for one character.
    pub fn value(self, m: &CharacterMetrics) -> f64 {
        match self {
            RankingMetric::Degree => m.degree as f64,
            RankingMetric::WeightedDegree => m.weighted_degree,
            RankingMetric::DegreeCentrality => m.degree_centrality,
            RankingMetric::Betweenness => m.betweenness,
            RankingMetric::Closeness => m.closeness,
            RankingMetric::Harmonic => m.harmonic,
            RankingMetric::PageRank => m.pagerank,
            RankingMetric::Eigenvector => m.eigenvector,
            RankingMetric::Katz => m.katz,
            RankingMetric::Clustering => m.clustering,
            RankingMetric::Constraint => m.constraint,
            RankingMetric::CoreNumber => m.core_number as f64,
        }
    }

    fn name(self) -> &'static str {
        match self {
            RankingMetric::Degree => "degree",
            RankingMetric::WeightedDegree => "weighted_degree",
            RankingMetric::DegreeCentrality => "degree_centrality",
            RankingMetric::Betweenness => "betweenness",
            RankingMetric::Closeness => "closeness",
            RankingMetric::Harmonic => "harmonic",
            RankingMetric::PageRank => "pagerank",
            RankingMetric::Eigenvector => "eigenvector",
            RankingMetric::Katz => "katz",
            RankingMetric::Clustering => "clustering",
            RankingMetric::Constraint => "constraint",
            RankingMetric::CoreNumber => "core_number",
        }
    }
}

impl fmt::Display for RankingMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RankingMetric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|m| m.name() == wanted)
            .ok_or_else(|| format!("unknown metric `{s}`"))
    }
}
