//! Interaction edge definition (aggregated event weight).

use serde::{Deserialize, Serialize};

/// Aggregated interactions between two characters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionEdge {
    /// Sum of event weights.
    pub weight: f64,
    /// Distinct (chapter, segment) locations contributing.
    pub segment_count: usize,
    /// Events contributing.
    pub event_count: usize,
    /// Events carrying a dialogue cue.
    pub dialogue_events: usize,
    /// Events carrying an action cue.
    pub action_events: usize,
    /// Events with no cue.
    pub co_occurrence_events: usize,
    /// Contributing chapters, ascending.
    pub chapters: Vec<u32>,
    /// Text of the earliest contributing segments, at most three.
    #[serde(default)]
    pub contexts: Vec<String>,
}

/// Row of `interactions.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
    /// Endpoint with the smaller id.
    pub character_a: String,
    /// Endpoint with the larger id.
    pub character_b: String,
    /// Sum of event weights.
    pub weight: f64,
    /// Distinct segments contributing.
    pub segment_count: usize,
    /// Events contributing.
    pub event_count: usize,
    /// Events carrying a dialogue cue.
    pub dialogue_events: usize,
    /// Events carrying an action cue.
    pub action_events: usize,
    /// Events with no cue.
    pub co_occurrence_events: usize,
    /// Contributing chapters, ascending.
    pub chapters: Vec<u32>,
    /// Text of the earliest contributing segments, at most three.
    #[serde(default)]
    pub contexts: Vec<String>,
}
