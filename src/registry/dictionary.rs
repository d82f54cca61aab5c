//! Character dictionary artifact: canonical id → display name → aliases.
//!
//! Three JSON layouts are accepted:
//!
//! ```json
//! { "baochai": { "name": "薛寶釵", "aliases": ["寶釵", "寶姐姐"], "affiliation": "薛家" } }
//! { "薛寶釵": ["薛寶釵", "寶釵", "寶姐姐"] }
//! [ { "id": "baochai", "name": "薛寶釵", "aliases": ["寶釵"] } ]
//! ```
//!
//! Object keys are read in document order without collapsing duplicates, so a
//! repeated id is reported instead of silently overwritten.

use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;

use serde::de::{self, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Serialize};

use crate::errors::{CharnetError, Result};

/// One character as declared in the dictionary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictionaryEntry {
    /// Canonical id.
    pub id: String,
    /// Display name (defaults to the id).
    pub name: String,
    /// Alias strings as written in the text.
    pub aliases: Vec<String>,
    /// Household / faction, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affiliation: Option<String>,
}

impl DictionaryEntry {
    /// Entry whose display name equals its id.
    pub fn new<I, S>(id: impl Into<String>, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            aliases: aliases.into_iter().map(Into::into).collect(),
            affiliation: None,
        }
    }

    /// Set the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the affiliation.
    pub fn with_affiliation(mut self, affiliation: impl Into<String>) -> Self {
        self.affiliation = Some(affiliation.into());
        self
    }
}

/// Parsed, load-time-validated dictionary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CharacterDictionary {
    entries: Vec<DictionaryEntry>,
}

impl CharacterDictionary {
    /// Validate and wrap entries. Rejects empty or duplicate ids and empty alias lists.
    pub fn from_entries(entries: Vec<DictionaryEntry>) -> Result<Self> {
        let mut seen = BTreeSet::new();
        for entry in &entries {
            if entry.id.trim().is_empty() {
                return Err(CharnetError::Dictionary("character id must not be empty".into()));
            }
            if !seen.insert(entry.id.as_str()) {
                return Err(CharnetError::DuplicateCharacter(entry.id.clone()));
            }
            if entry.aliases.is_empty() {
                return Err(CharnetError::EmptyAliases(entry.id.clone()));
            }
        }
        Ok(Self { entries })
    }

    /// Parse a JSON document in any supported layout.
    pub fn from_json_str(s: &str) -> Result<Self> {
        let document: DictionaryDocument = serde_json::from_str(s)?;
        Self::from_entries(document.0)
    }

    /// Read and parse a dictionary file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let s = std::fs::read_to_string(path)?;
        Self::from_json_str(&s)
    }

    /// Entries in document order.
    pub fn entries(&self) -> &[DictionaryEntry] {
        &self.entries
    }

    /// Consume into entries.
    pub fn into_entries(self) -> Vec<DictionaryEntry> {
        self.entries
    }

    /// Number of characters.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the dictionary declares no characters.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum EntryBody {
    Aliases(Vec<String>),
    Full {
        #[serde(default)]
        name: Option<String>,
        aliases: Vec<String>,
        #[serde(default)]
        affiliation: Option<String>,
    },
}

impl EntryBody {
    fn into_entry(self, id: String) -> DictionaryEntry {
        match self {
            EntryBody::Aliases(aliases) => DictionaryEntry::new(id, aliases),
            EntryBody::Full {
                name,
                aliases,
                affiliation,
            } => DictionaryEntry {
                name: name.unwrap_or_else(|| id.clone()),
                id,
                aliases,
                affiliation,
            },
        }
    }
}

#[derive(Deserialize)]
struct ListedEntry {
    id: String,
    #[serde(default)]
    name: Option<String>,
    aliases: Vec<String>,
    #[serde(default)]
    affiliation: Option<String>,
}

struct DictionaryDocument(Vec<DictionaryEntry>);

impl<'de> Deserialize<'de> for DictionaryDocument {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(DocumentVisitor)
    }
}

struct DocumentVisitor;

impl<'de> Visitor<'de> for DocumentVisitor {
    type Value = DictionaryDocument;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of character id to aliases, or a list of character entries")
    }

    fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut entries = Vec::new();
        while let Some((id, body)) = map.next_entry::<String, EntryBody>()? {
            entries.push(body.into_entry(id));
        }
        Ok(DictionaryDocument(entries))
    }

    fn visit_seq<A>(self, mut seq: A) -> std::result::Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut entries = Vec::new();
        while let Some(listed) = seq.next_element::<ListedEntry>()? {
            let body = EntryBody::Full {
                name: listed.name,
                aliases: listed.aliases,
                affiliation: listed.affiliation,
            };
            entries.push(body.into_entry(listed.id));
        }
        Ok(DictionaryDocument(entries))
    }

    fn visit_unit<E>(self) -> std::result::Result<Self::Value, E>
    where
        E: de::Error,
    {
        Err(E::custom("dictionary must not be null"))
    }
}
