//! Common core types used across the pipeline.

use std::fmt;

use lasso::{Key, Spur};
use serde::{Deserialize, Serialize};

/// Interned handle for a canonical character id.
///
/// Keys are issued by the [`CharacterRegistry`](crate::registry::CharacterRegistry)
/// in sorted id order, so comparing two keys gives the same answer as
/// comparing their canonical id strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CharacterKey(pub Spur);

impl CharacterKey {
    /// Dense index of this key (0-based, in canonical id order).
    pub fn index(self) -> usize {
        self.0.into_usize()
    }
}

impl From<Spur> for CharacterKey {
    fn from(s: Spur) -> Self {
        Self(s)
    }
}

impl From<CharacterKey> for Spur {
    fn from(k: CharacterKey) -> Self {
        k.0
    }
}

/// Unordered pair of distinct characters, stored as `(low, high)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CharacterPair {
    low: CharacterKey,
    high: CharacterKey,
}

impl CharacterPair {
    /// Build a pair; `None` for a self-pair.
    pub fn new(a: CharacterKey, b: CharacterKey) -> Option<Self> {
        match a.cmp(&b) {
            std::cmp::Ordering::Less => Some(Self { low: a, high: b }),
            std::cmp::Ordering::Greater => Some(Self { low: b, high: a }),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// Endpoint with the smaller canonical id.
    pub fn low(&self) -> CharacterKey {
        self.low
    }

    /// Endpoint with the larger canonical id.
    pub fn high(&self) -> CharacterKey {
        self.high
    }
}

/// Location of a segment: chapter number and index within that chapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SegmentRef {
    /// Chapter number.
    pub chapter: u32,
    /// Sequential segment index within the chapter.
    pub index: usize,
}

impl fmt::Display for SegmentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ch{}#{}", self.chapter, self.index)
    }
}

/// Coarse cue attached to a segment; drives the weight multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionKind {
    /// Plain co-mention in the same unit.
    CoOccurrence,
    /// An action verb links the participants.
    Action,
    /// Attributed speech.
    Dialogue,
}

impl fmt::Display for InteractionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            InteractionKind::CoOccurrence => "co_occurrence",
            InteractionKind::Action => "action",
            InteractionKind::Dialogue => "dialogue",
        };
        f.write_str(s)
    }
}
