//! Per-chapter mention profiles and chapter selection by character.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::registry::CharacterRegistry;

/// Mention statistics of one chapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterProfile {
    /// Chapter number.
    pub chapter: u32,
    /// Text length in characters.
    pub length: usize,
    /// Segments produced.
    pub segments: usize,
    /// Canonical id → alias occurrences in the full text.
    pub mentions: BTreeMap<String, usize>,
}

impl ChapterProfile {
    /// Profile a chapter by scanning its whole text.
    pub fn new(chapter: u32, text: &str, segments: usize, registry: &CharacterRegistry) -> Self {
        let mut mentions = BTreeMap::new();
        for m in registry.scan(text) {
            *mentions.entry(registry.id(m.key).to_string()).or_insert(0) += 1;
        }
        Self {
            chapter,
            length: text.chars().count(),
            segments,
            mentions,
        }
    }

    /// Mentions of one character.
    pub fn mentions_of(&self, id: &str) -> usize {
        self.mentions.get(id).copied().unwrap_or(0)
    }
}

/// A chapter selected for a character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChapterRanking {
    /// Chapter number.
    pub chapter: u32,
    /// Mentions of the character.
    pub mentions: usize,
    /// Text length in characters.
    pub length: usize,
    /// Mentions per 1000 characters.
    pub density: f64,
}

/// The `top_n` chapters mentioning `id` most often, returned in chapter order.
pub fn rank_chapters(profiles: &[ChapterProfile], id: &str, top_n: usize) -> Vec<ChapterRanking> {
    let mut ranked: Vec<ChapterRanking> = profiles
        .iter()
        .map(|p| {
            let mentions = p.mentions_of(id);
            ChapterRanking {
                chapter: p.chapter,
                mentions,
                length: p.length,
                density: if p.length > 0 {
                    mentions as f64 / p.length as f64 * 1000.0
                } else {
                    0.0
                },
            }
        })
        .collect();

    ranked.sort_by(|a, b| b.mentions.cmp(&a.mentions).then(a.chapter.cmp(&b.chapter)));
    ranked.truncate(top_n);
    ranked.sort_by_key(|r| r.chapter);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RegistryConfig;
    use crate::registry::DictionaryEntry;

    #[test]
    fn selects_top_chapters_in_chapter_order() {
        let reg = CharacterRegistry::new(
            vec![DictionaryEntry::new("baochai", ["寶釵", "薛寶釵"])],
            &RegistryConfig::default(),
        )
        .unwrap();
        let profiles = vec![
            ChapterProfile::new(1, "寶釵", 1, &reg),
            ChapterProfile::new(2, "薛寶釵與寶釵寶釵", 1, &reg),
            ChapterProfile::new(3, "無人", 1, &reg),
            ChapterProfile::new(4, "寶釵寶釵", 1, &reg),
        ];
        assert_eq!(profiles[1].mentions_of("baochai"), 3);

        let top = rank_chapters(&profiles, "baochai", 2);
        let chapters: Vec<_> = top.iter().map(|r| r.chapter).collect();
        assert_eq!(chapters, vec![2, 4]);
        assert!((top[1].density - 500.0).abs() < 1e-9);

        assert_eq!(rank_chapters(&profiles, "baochai", 10).len(), 4);
    }
}
