//! High-level pipelines.

pub mod analyze;
pub mod chapters;

pub use analyze::{AnalysisPipeline, PipelineOutput};
pub use chapters::{rank_chapters, ChapterProfile, ChapterRanking};
