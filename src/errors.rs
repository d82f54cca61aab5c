//! Error types for charnet-core.

use thiserror::Error;

/// Top-level error type for charnet operations.
///
/// Only construction-time problems surface as errors. Per-segment and
/// per-chapter anomalies are collected into
/// [`ExtractionDiagnostics`](crate::extract::ExtractionDiagnostics) instead.
#[derive(Debug, Error)]
pub enum CharnetError {
    /// Invalid pipeline configuration (segmentation, weighting, metrics).
    #[error("configuration error: {0}")]
    Config(String),

    /// Malformed character dictionary artifact.
    #[error("dictionary error: {0}")]
    Dictionary(String),

    /// The same canonical id appears twice in the dictionary.
    #[error("duplicate character id `{0}`")]
    DuplicateCharacter(String),

    /// A character was registered without any usable alias.
    #[error("character `{0}` has no aliases")]
    EmptyAliases(String),

    /// One normalized alias is claimed by two different characters.
    #[error("alias `{alias}` is registered to both `{first}` and `{second}`")]
    AliasConflict {
        /// The alias, after normalization.
        alias: String,
        /// Character that registered the alias first (in id order).
        first: String,
        /// Character that tried to register it again.
        second: String,
    },

    /// A character key that the registry in use never issued.
    #[error("character key {0} is not known to this registry")]
    UnknownCharacter(usize),

    /// A specific chapter could not be read.
    #[error("chapter {chapter}: {reason}")]
    Chapter {
        /// Chapter number.
        chapter: u32,
        /// Cause.
        reason: String,
    },

    /// Chapter ingestion errors.
    #[error("corpus error: {0}")]
    Corpus(String),

    /// I/O error wrapper.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serde serialization/deserialization error.
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Result type for charnet operations.
pub type Result<T> = std::result::Result<T, CharnetError>;
