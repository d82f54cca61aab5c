#![forbid(unsafe_code)]
#![deny(missing_debug_implementations, missing_docs, rust_2018_idioms)]

//! # charnet-core
//!
//! Character interaction networks from narrative text:
//! - alias resolution against a character dictionary (longest alias first)
//! - sentence / window segmentation and pairwise interaction events
//! - a weighted interaction graph with centralities and Louvain communities
//!
//! Every stage is deterministic: the same dictionary, text and configuration
//! always produce byte-identical artifacts.

pub mod analysis;
pub mod config;
pub mod corpus;
pub mod errors;
pub mod extract;
pub mod graph;
/// High-level pipelines.
pub mod pipeline;
/// Persistence layer.
pub mod persistence;
pub mod registry;
/// Text segmentation.
pub mod segment;
pub mod types;

pub use analysis::{FocalView, MetricsEngine, MetricsReport, RankingMetric};
pub use config::CharnetConfig;
pub use errors::CharnetError;
pub use extract::{InteractionEvent, InteractionExtractor};
pub use graph::InteractionGraph;
pub use pipeline::{AnalysisPipeline, PipelineOutput};
pub use registry::CharacterRegistry;
pub use types::{CharacterKey, CharacterPair, InteractionKind, SegmentRef};
