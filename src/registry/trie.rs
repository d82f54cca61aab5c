//! Character trie over normalized aliases.

use std::collections::HashMap;

use super::interner::StableHasher;
use crate::types::CharacterKey;

#[derive(Debug, Default)]
struct TrieNode {
    children: HashMap<char, usize, StableHasher>,
    terminal: Option<CharacterKey>,
}

/// Arena-backed trie; node 0 is the root.
#[derive(Debug)]
pub(crate) struct AliasTrie {
    nodes: Vec<TrieNode>,
}

impl AliasTrie {
    pub(crate) fn new() -> Self {
        Self {
            nodes: vec![TrieNode::default()],
        }
    }

    /// Register `alias` for `key`.
    ///
    /// Returns the current owner if the alias is already registered; the
    /// trie is left unchanged in that case.
    pub(crate) fn insert(&mut self, alias: &str, key: CharacterKey) -> Option<CharacterKey> {
        let mut current = 0;
        for c in alias.chars() {
            current = match self.nodes[current].children.get(&c) {
                Some(&next) => next,
                None => {
                    let next = self.nodes.len();
                    self.nodes.push(TrieNode::default());
                    self.nodes[current].children.insert(c, next);
                    next
                }
            };
        }
        match self.nodes[current].terminal {
            Some(owner) => Some(owner),
            None => {
                self.nodes[current].terminal = Some(key);
                None
            }
        }
    }

    /// Exact lookup of a whole normalized string.
    pub(crate) fn get(&self, chars: &[char]) -> Option<CharacterKey> {
        let mut current = 0;
        for c in chars {
            current = *self.nodes[current].children.get(c)?;
        }
        self.nodes[current].terminal
    }

    /// Every alias that is a prefix of `chars`, shortest first, as `(len, key)`.
    pub(crate) fn prefixes(&self, chars: &[char]) -> Vec<(usize, CharacterKey)> {
        let mut out = Vec::new();
        let mut current = 0;
        for (i, c) in chars.iter().enumerate() {
            match self.nodes[current].children.get(c) {
                Some(&next) => current = next,
                None => break,
            }
            if let Some(key) = self.nodes[current].terminal {
                out.push((i + 1, key));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lasso::{Key, Spur};

    fn key(i: usize) -> CharacterKey {
        CharacterKey(Spur::try_from_usize(i).unwrap())
    }

    #[test]
    fn prefixes_are_shortest_first() {
        let mut trie = AliasTrie::new();
        assert_eq!(trie.insert("寶釵", key(0)), None);
        assert_eq!(trie.insert("寶", key(1)), None);
        assert_eq!(trie.insert("寶釵姐姐", key(2)), None);

        let text: Vec<char> = "寶釵姐姐來了".chars().collect();
        let found = trie.prefixes(&text);
        assert_eq!(found, vec![(1, key(1)), (2, key(0)), (4, key(2))]);
    }

    #[test]
    fn reinsert_reports_owner() {
        let mut trie = AliasTrie::new();
        trie.insert("bob", key(3));
        assert_eq!(trie.insert("bob", key(4)), Some(key(3)));
        let bob: Vec<char> = "bob".chars().collect();
        assert_eq!(trie.get(&bob), Some(key(3)));
        let bo: Vec<char> = "bo".chars().collect();
        assert_eq!(trie.get(&bo), None);
    }
}
