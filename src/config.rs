//! Pipeline configuration: segmentation, weighting and metric parameters.
//!
//! Every knob that changes the produced artifacts lives here, so a run is
//! reproducible from its `metadata.json` alone.

use serde::{Deserialize, Serialize};

use crate::errors::{CharnetError, Result};

/// Top-level configuration for a pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharnetConfig {
    /// Alias matching options.
    pub registry: RegistryConfig,
    /// How chapter text is cut into analysis units.
    pub segmentation: SegmentationConfig,
    /// Event emission and weighting policy.
    pub extraction: ExtractionConfig,
    /// Centrality and community parameters.
    pub metrics: MetricsConfig,
}

impl CharnetConfig {
    /// Check parameter ranges. Called before any stage is constructed.
    pub fn validate(&self) -> Result<()> {
        self.segmentation.validate()?;
        self.extraction.validate()?;
        self.metrics.validate()
    }
}

/// Alias matching options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Reject matches glued to neighbouring alphanumerics ("Bob" in "Bobby").
    /// Only meaningful for space-delimited scripts.
    pub word_boundaries: bool,
}

/// Analysis unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SegmentUnit {
    /// One segment per sentence.
    Sentence,
    /// Fixed windows of `size` characters advancing by `stride` characters.
    Window {
        /// Window length in characters.
        size: usize,
        /// Step between window starts in characters.
        stride: usize,
    },
}

/// Segmentation parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentationConfig {
    /// Unit type.
    pub unit: SegmentUnit,
    /// Characters that end a sentence.
    pub sentence_terminators: Vec<char>,
    /// Closing quotes/brackets kept with the sentence they follow.
    pub closing_marks: Vec<char>,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            unit: SegmentUnit::Sentence,
            sentence_terminators: "。！？；!?.\n".chars().collect(),
            closing_marks: "」』”’\"）)".chars().collect(),
        }
    }
}

impl SegmentationConfig {
    /// Check the unit parameters.
    pub fn validate(&self) -> Result<()> {
        match self.unit {
            SegmentUnit::Sentence => {
                if self.sentence_terminators.is_empty() {
                    return Err(CharnetError::Config(
                        "sentence segmentation needs at least one terminator".into(),
                    ));
                }
            }
            SegmentUnit::Window { size, stride } => {
                if size == 0 || stride == 0 {
                    return Err(CharnetError::Config(format!(
                        "window size and stride must be positive (size={size}, stride={stride})"
                    )));
                }
                if stride > size {
                    return Err(CharnetError::Config(format!(
                        "window stride {stride} exceeds size {size}; text between windows would be skipped"
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Event emission and weighting policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Weight of an event before cue multipliers.
    pub base_weight: f64,
    /// Multiplier for segments carrying a dialogue cue.
    pub dialogue_multiplier: f64,
    /// Multiplier for segments carrying an action cue.
    pub action_multiplier: f64,
    /// Segments with more distinct characters than this are crowd scenes
    /// and produce no events.
    pub max_characters_per_segment: usize,
    /// Cue vocabulary for the default detector.
    pub cues: CueConfig,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            base_weight: 1.0,
            dialogue_multiplier: 2.0,
            action_multiplier: 1.0,
            max_characters_per_segment: 8,
            cues: CueConfig::default(),
        }
    }
}

impl ExtractionConfig {
    /// Check weights, the crowd-scene cap and cue vocabulary.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("base_weight", self.base_weight),
            ("dialogue_multiplier", self.dialogue_multiplier),
            ("action_multiplier", self.action_multiplier),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(CharnetError::Config(format!(
                    "{name} must be a positive finite number, got {value}"
                )));
            }
        }
        if self.max_characters_per_segment < 2 {
            return Err(CharnetError::Config(format!(
                "max_characters_per_segment must be at least 2, got {}",
                self.max_characters_per_segment
            )));
        }
        if self.cues.speech_verbs.iter().any(|v| v.is_empty())
            || self.cues.action_verbs.iter().any(|v| v.is_empty())
        {
            return Err(CharnetError::Config("cue verbs must be non-empty strings".into()));
        }
        Ok(())
    }
}

/// Vocabulary for [`SpeechCueDetector`](crate::extract::SpeechCueDetector).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CueConfig {
    /// Verbs introducing speech.
    pub speech_verbs: Vec<String>,
    /// Verbs marking physical interaction.
    pub action_verbs: Vec<String>,
    /// Max non-whitespace characters between a speaker mention and the verb.
    pub max_speaker_gap: usize,
}

impl Default for CueConfig {
    fn default() -> Self {
        let speech = [
            "道", "說", "問", "答", "叫", "勸", "罵", "said", "asked", "replied", "answered",
            "cried", "whispered", "shouted",
        ];
        let action = [
            "見", "遇", "訪", "送", "給", "拉", "推", "met", "visited", "gave", "sent", "followed",
            "pulled", "pushed",
        ];
        Self {
            speech_verbs: speech.iter().map(|s| s.to_string()).collect(),
            action_verbs: action.iter().map(|s| s.to_string()).collect(),
            max_speaker_gap: 2,
        }
    }
}

/// Centrality and community parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Modularity resolution (higher = smaller communities).
    pub community_resolution: f64,
    /// Cap on local-moving sweeps per Louvain level.
    pub max_community_passes: usize,
    /// Minimum modularity gain for a node move.
    pub min_modularity_gain: f64,
    /// PageRank damping factor.
    pub pagerank_damping: f64,
    /// PageRank iteration cap.
    pub pagerank_max_iter: usize,
    /// PageRank convergence tolerance (per node).
    pub pagerank_tolerance: f64,
    /// Eigenvector centrality iteration cap.
    pub eigenvector_max_iter: usize,
    /// Katz attenuation factor; must stay below the inverse of the largest
    /// adjacency eigenvalue for the iteration to converge.
    pub katz_alpha: f64,
    /// Katz iteration cap.
    pub katz_max_iter: usize,
    /// Convergence tolerance (per node) of the eigenvector and Katz iterations.
    pub power_tolerance: f64,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            community_resolution: 1.0,
            max_community_passes: 100,
            min_modularity_gain: 1e-12,
            pagerank_damping: 0.85,
            pagerank_max_iter: 100,
            pagerank_tolerance: 1e-6,
            eigenvector_max_iter: 1000,
            katz_alpha: 0.1,
            katz_max_iter: 1000,
            power_tolerance: 1e-6,
        }
    }
}

impl MetricsConfig {
    /// Check metric parameter ranges.
    pub fn validate(&self) -> Result<()> {
        if !(self.community_resolution.is_finite() && self.community_resolution > 0.0) {
            return Err(CharnetError::Config(format!(
                "community_resolution must be positive, got {}",
                self.community_resolution
            )));
        }
        if !(self.pagerank_damping > 0.0 && self.pagerank_damping < 1.0) {
            return Err(CharnetError::Config(format!(
                "pagerank_damping must be in (0, 1), got {}",
                self.pagerank_damping
            )));
        }
        if !(self.katz_alpha.is_finite() && self.katz_alpha > 0.0) {
            return Err(CharnetError::Config(format!(
                "katz_alpha must be positive, got {}",
                self.katz_alpha
            )));
        }
        if self.max_community_passes == 0
            || self.pagerank_max_iter == 0
            || self.eigenvector_max_iter == 0
            || self.katz_max_iter == 0
        {
            return Err(CharnetError::Config("iteration caps must be positive".into()));
        }
        if self.min_modularity_gain < 0.0
            || self.pagerank_tolerance <= 0.0
            || self.power_tolerance <= 0.0
        {
            return Err(CharnetError::Config("tolerances must be positive".into()));
        }
        Ok(())
    }
}
