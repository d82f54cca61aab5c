//! Character registry: canonical characters, alias sets, mention resolution.
//!
//! The registry is built once from a [`CharacterDictionary`] and is read-only
//! afterwards; every later stage borrows it.

use std::collections::HashSet;
use std::fmt;

use crate::{
    config::RegistryConfig,
    errors::{CharnetError, Result},
    types::CharacterKey,
};

/// Dictionary artifact loading.
pub mod dictionary;
/// Id interning and the deterministic hasher.
pub mod interner;
pub mod normalize;
mod trie;

pub use dictionary::{CharacterDictionary, DictionaryEntry};
pub use interner::{CharacterInterner, StableHasher};
pub use normalize::normalize;

use normalize::NormalizedText;
use trie::AliasTrie;

/// A registered character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Character {
    /// Interned handle.
    pub key: CharacterKey,
    /// Canonical id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Aliases as declared (deduplicated after normalization).
    pub aliases: Vec<String>,
    /// Household / faction, if known.
    pub affiliation: Option<String>,
}

/// One alias occurrence found by [`CharacterRegistry::scan`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mention {
    /// Resolved character.
    pub key: CharacterKey,
    /// Byte offset of the first matched char in the scanned text.
    pub start: usize,
    /// Byte offset just past the last matched char.
    pub end: usize,
}

/// Immutable alias → canonical id lookup structure.
pub struct CharacterRegistry {
    interner: CharacterInterner,
    characters: Vec<Character>,
    trie: AliasTrie,
    alias_count: usize,
    word_boundaries: bool,
}

impl fmt::Debug for CharacterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CharacterRegistry")
            .field("characters", &self.characters.len())
            .field("aliases", &self.alias_count)
            .field("word_boundaries", &self.word_boundaries)
            .finish()
    }
}

impl CharacterRegistry {
    /// Build from a validated dictionary.
    pub fn from_dictionary(dictionary: CharacterDictionary, config: &RegistryConfig) -> Result<Self> {
        Self::new(dictionary.into_entries(), config)
    }

    /// Build from raw entries.
    ///
    /// Fails on empty or duplicate ids, characters without usable aliases,
    /// and aliases claimed by two characters.
    pub fn new(mut entries: Vec<DictionaryEntry>, config: &RegistryConfig) -> Result<Self> {
        entries.sort_by(|a, b| a.id.cmp(&b.id));
        if let Some(pair) = entries.windows(2).find(|w| w[0].id == w[1].id) {
            return Err(CharnetError::DuplicateCharacter(pair[0].id.clone()));
        }

        // Interning in sorted order makes key order equal id order.
        let mut interner = interner::interner_builder();
        let mut trie = AliasTrie::new();
        let mut characters: Vec<Character> = Vec::with_capacity(entries.len());
        let mut alias_count = 0;

        for entry in entries {
            if entry.id.trim().is_empty() {
                return Err(CharnetError::Dictionary("character id must not be empty".into()));
            }
            if entry.aliases.is_empty() {
                return Err(CharnetError::EmptyAliases(entry.id));
            }

            let key = CharacterKey(interner.get_or_intern(&entry.id));
            let mut seen = HashSet::new();
            let mut aliases = Vec::with_capacity(entry.aliases.len());

            for alias in entry.aliases {
                let norm = normalize(&alias);
                if norm.is_empty() {
                    return Err(CharnetError::Dictionary(format!(
                        "character `{}` has a blank alias",
                        entry.id
                    )));
                }
                if !seen.insert(norm.clone()) {
                    continue;
                }
                if let Some(owner) = trie.insert(&norm, key) {
                    return Err(CharnetError::AliasConflict {
                        alias: norm,
                        first: characters[owner.index()].id.clone(),
                        second: entry.id,
                    });
                }
                aliases.push(alias);
            }

            alias_count += aliases.len();
            characters.push(Character {
                key,
                id: entry.id,
                name: entry.name,
                aliases,
                affiliation: entry.affiliation,
            });
        }

        tracing::debug!(
            "registry built: {} characters, {} aliases",
            characters.len(),
            alias_count
        );

        Ok(Self {
            interner: interner.into_reader(),
            characters,
            trie,
            alias_count,
            word_boundaries: config.word_boundaries,
        })
    }

    /// Resolve a mention to a canonical character.
    ///
    /// An exact (normalized) alias match wins; otherwise the leftmost-longest
    /// alias contained in the mention is used. `None` when nothing matches.
    pub fn resolve(&self, mention: &str) -> Option<CharacterKey> {
        let mention = mention.trim();
        let norm = NormalizedText::new(mention);
        if norm.is_empty() {
            return None;
        }
        self.trie
            .get(norm.chars())
            .or_else(|| self.scan_normalized(mention, &norm).first().map(|m| m.key))
    }

    /// Resolve a mention straight to its canonical id.
    pub fn resolve_id(&self, mention: &str) -> Option<&str> {
        self.resolve(mention).map(|key| self.id(key))
    }

    /// Find every alias occurrence in `text`: leftmost, longest, non-overlapping.
    pub fn scan(&self, text: &str) -> Vec<Mention> {
        let norm = NormalizedText::new(text);
        self.scan_normalized(text, &norm)
    }

    fn scan_normalized(&self, text: &str, norm: &NormalizedText) -> Vec<Mention> {
        let chars = norm.chars();
        let mut out = Vec::new();
        let mut i = 0;

        while i < chars.len() {
            let mut step = 1;
            for (len, key) in self.trie.prefixes(&chars[i..]).into_iter().rev() {
                let (start, end) = norm.source_span(i, len);
                if self.word_boundaries && !at_word_boundary(text, start, end) {
                    continue;
                }
                out.push(Mention { key, start, end });
                step = len;
                break;
            }
            i += step;
        }

        out
    }

    /// Key for a canonical id.
    pub fn key(&self, id: &str) -> Option<CharacterKey> {
        self.interner.get(id).map(CharacterKey)
    }

    /// Canonical id for a key issued by this registry.
    pub fn id(&self, key: CharacterKey) -> &str {
        self.interner.resolve(&key.0)
    }

    /// Character record for a key issued by this registry.
    pub fn character(&self, key: CharacterKey) -> &Character {
        &self.characters[key.index()]
    }

    /// Character record, or `None` for a foreign key.
    pub fn get(&self, key: CharacterKey) -> Option<&Character> {
        self.characters.get(key.index())
    }

    /// All characters in canonical id order.
    pub fn characters(&self) -> impl Iterator<Item = &Character> {
        self.characters.iter()
    }

    /// Number of characters.
    pub fn len(&self) -> usize {
        self.characters.len()
    }

    /// Whether no characters are registered.
    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }

    /// Number of distinct aliases across all characters.
    pub fn alias_count(&self) -> usize {
        self.alias_count
    }
}

fn at_word_boundary(text: &str, start: usize, end: usize) -> bool {
    let glued = |a: Option<char>, b: Option<char>| {
        matches!((a, b), (Some(x), Some(y)) if x.is_alphanumeric() && y.is_alphanumeric())
    };
    let matched = &text[start..end];
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    !glued(before, matched.chars().next()) && !glued(matched.chars().next_back(), after)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry(entries: Vec<DictionaryEntry>) -> CharacterRegistry {
        CharacterRegistry::new(entries, &RegistryConfig::default()).unwrap()
    }

    fn alice_bob() -> CharacterRegistry {
        registry(vec![
            DictionaryEntry::new("A", ["Alice", "A."]),
            DictionaryEntry::new("B", ["Bob"]),
        ])
    }

    #[test]
    fn resolves_case_and_whitespace_variants() {
        let reg = alice_bob();
        assert_eq!(reg.resolve_id("Alice"), Some("A"));
        assert_eq!(reg.resolve_id("  ALICE "), Some("A"));
        assert_eq!(reg.resolve_id("a."), Some("A"));
        assert_eq!(reg.resolve_id("Bob"), Some("B"));
        assert_eq!(reg.resolve_id("Carol"), None);
        assert_eq!(reg.resolve_id(""), None);
    }

    #[test]
    fn aliases_never_span_a_word_gap() {
        let reg = registry(vec![
            DictionaryEntry::new("A", ["Ada"]),
            DictionaryEntry::new("B", ["Bob"]),
        ]);
        let found = reg.scan("Bob ate bread and jam.");
        assert_eq!(found.len(), 1);
        assert_eq!(reg.id(found[0].key), "B");
    }

    #[test]
    fn multi_word_aliases_tolerate_spacing() {
        let reg = registry(vec![DictionaryEntry::new("daiyu", ["Lin Daiyu"])]);
        let text = "Then LIN\n  daiyu came; lindaiyu did not.";
        let found = reg.scan(text);
        assert_eq!(found.len(), 1);
        assert_eq!(&text[found[0].start..found[0].end], "LIN\n  daiyu");
        assert_eq!(reg.resolve_id(" lin   daiyu "), Some("daiyu"));
    }

    #[test]
    fn resolve_is_deterministic() {
        let reg = alice_bob();
        let first: Vec<_> = ["Alice", "Bob", "Zed", "A."].iter().map(|m| reg.resolve(m)).collect();
        for _ in 0..5 {
            let again: Vec<_> = ["Alice", "Bob", "Zed", "A."].iter().map(|m| reg.resolve(m)).collect();
            assert_eq!(first, again);
        }
    }

    #[test]
    fn longest_alias_wins_across_characters() {
        let reg = registry(vec![
            DictionaryEntry::new("baochai", ["寶釵", "薛寶釵"]),
            DictionaryEntry::new("xue_mother", ["薛姨媽", "姨媽"]),
            DictionaryEntry::new("bao", ["寶"]),
        ]);
        assert_eq!(reg.resolve_id("寶釵"), Some("baochai"));
        assert_eq!(reg.resolve_id("薛寶釵來了"), Some("baochai"));
        assert_eq!(reg.resolve_id("寶"), Some("bao"));

        let text = "薛姨媽與寶釵說話";
        let mentions = reg.scan(text);
        let ids: Vec<_> = mentions.iter().map(|m| reg.id(m.key)).collect();
        assert_eq!(ids, vec!["xue_mother", "baochai"]);
        assert_eq!(&text[mentions[1].start..mentions[1].end], "寶釵");
    }

    #[test]
    fn keys_follow_id_order() {
        let reg = registry(vec![
            DictionaryEntry::new("zeta", ["Z"]),
            DictionaryEntry::new("alpha", ["Al"]),
        ]);
        let alpha = reg.key("alpha").unwrap();
        let zeta = reg.key("zeta").unwrap();
        assert!(alpha < zeta);
        assert_eq!(reg.character(alpha).id, "alpha");
        assert_eq!(reg.characters().map(|c| c.id.as_str()).collect::<Vec<_>>(), vec!["alpha", "zeta"]);
    }

    #[test]
    fn rejects_alias_shared_by_two_characters() {
        let err = CharacterRegistry::new(
            vec![
                DictionaryEntry::new("A", ["Alice"]),
                DictionaryEntry::new("B", ["alice"]),
            ],
            &RegistryConfig::default(),
        )
        .unwrap_err();
        match err {
            CharnetError::AliasConflict { alias, first, second } => {
                assert_eq!(alias, "alice");
                assert_eq!(first, "A");
                assert_eq!(second, "B");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn duplicate_alias_within_character_is_folded() {
        let reg = registry(vec![DictionaryEntry::new("薛姨媽", ["薛姨媽", "薛姨媽", "姨媽"])]);
        assert_eq!(reg.alias_count(), 2);
    }

    #[test]
    fn rejects_malformed_entries() {
        let config = RegistryConfig::default();
        let empty = vec![DictionaryEntry::new("A", Vec::<String>::new())];
        assert!(matches!(CharacterRegistry::new(empty, &config), Err(CharnetError::EmptyAliases(_))));

        let blank = vec![DictionaryEntry::new("A", ["  "])];
        assert!(matches!(CharacterRegistry::new(blank, &config), Err(CharnetError::Dictionary(_))));

        let dup = vec![DictionaryEntry::new("A", ["x"]), DictionaryEntry::new("A", ["y"])];
        assert!(matches!(CharacterRegistry::new(dup, &config), Err(CharnetError::DuplicateCharacter(_))));
    }

    #[test]
    fn word_boundaries_reject_glued_matches() {
        let entries = vec![
            DictionaryEntry::new("B", ["Bob"]),
            DictionaryEntry::new("R", ["Rob"]),
        ];
        let loose = CharacterRegistry::new(entries.clone(), &RegistryConfig::default()).unwrap();
        assert_eq!(loose.scan("Bobby and Rob").len(), 2);

        let strict = CharacterRegistry::new(entries, &RegistryConfig { word_boundaries: true }).unwrap();
        let found = strict.scan("Bobby and Rob");
        assert_eq!(found.len(), 1);
        assert_eq!(strict.id(found[0].key), "R");
    }
}
