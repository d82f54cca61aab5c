//! Character node definition.

use crate::{registry::Character, types::CharacterKey};

/// A character that takes part in at least one interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterNode {
    /// Interned handle.
    pub key: CharacterKey,
    /// Canonical id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Household / faction, if known.
    pub affiliation: Option<String>,
}

impl CharacterNode {
    /// Node for a registered character.
    pub fn new(character: &Character) -> Self {
        Self {
            key: character.key,
            id: character.id.clone(),
            name: character.name.clone(),
            affiliation: character.affiliation.clone(),
        }
    }
}
