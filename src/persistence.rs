//! Persistence layer for analysis artifacts.
//! Saves/loads: metadata, interactions, events, metrics, diagnostics, chapter profiles.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::analysis::MetricsReport;
use crate::config::CharnetConfig;
use crate::graph::EdgeRecord;
use crate::pipeline::PipelineOutput;
use crate::registry::CharacterRegistry;

/// Metadata stored with the artifacts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactMetadata {
    /// Version of the charnet core library.
    pub version: String,
    /// ISO 8601 timestamp of creation.
    pub created_at: String,
    /// Configuration the artifacts were produced with.
    pub config: CharnetConfig,
    /// Characters in the dictionary.
    pub dictionary_characters: usize,
    /// Chapters processed, ascending.
    pub chapters: Vec<u32>,
}

impl ArtifactMetadata {
    /// Create new metadata with current version and timestamp.
    pub fn new(config: &CharnetConfig, registry: &CharacterRegistry, output: &PipelineOutput) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
            config: config.clone(),
            dictionary_characters: registry.len(),
            chapters: output.chapters.iter().map(|c| c.chapter).collect(),
        }
    }
}

fn write_json<T: Serialize + ?Sized>(dir: &Path, name: &str, value: &T) -> Result<()> {
    let path = dir.join(name);
    let file = File::create(&path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    writer.flush()?;
    Ok(())
}

fn read_json<T: DeserializeOwned>(dir: &Path, name: &str) -> Result<T> {
    let path = dir.join(name);
    let file = File::open(&path).with_context(|| format!("Failed to open {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Save every artifact of a run into `out_dir`. `events.json` is written only
/// when `include_events` is set.
pub fn save_artifacts(
    out_dir: &Path,
    metadata: &ArtifactMetadata,
    registry: &CharacterRegistry,
    output: &PipelineOutput,
    include_events: bool,
) -> Result<()> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;

    write_json(out_dir, "metadata.json", metadata)?;
    write_json(out_dir, "interactions.json", &output.edge_records())?;
    if include_events {
        write_json(out_dir, "events.json", &output.event_records(registry))?;
    }
    write_json(out_dir, "metrics.json", &output.report)?;
    write_json(out_dir, "diagnostics.json", &output.diagnostics)?;
    write_json(out_dir, "chapters.json", &output.chapters)?;

    tracing::info!("artifacts written to {}", out_dir.display());
    Ok(())
}

/// Load `metadata.json`.
pub fn load_metadata(dir: &Path) -> Result<ArtifactMetadata> {
    read_json(dir, "metadata.json")
}

/// Load `metrics.json`.
pub fn load_metrics(dir: &Path) -> Result<MetricsReport> {
    read_json(dir, "metrics.json")
}

/// Load `interactions.json`.
pub fn load_interactions(dir: &Path) -> Result<Vec<EdgeRecord>> {
    read_json(dir, "interactions.json")
}
