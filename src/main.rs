use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use charnet_core::{
    corpus::open_chapters,
    persistence,
    pipeline::rank_chapters,
    registry::CharacterDictionary,
    AnalysisPipeline, CharacterRegistry, CharnetConfig, FocalView, RankingMetric,
};

#[derive(Parser, Debug)]
#[command(name = "charnet", about = "Character interaction network CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Extract interactions, build the network and write all artifacts.
    Analyze {
        /// Character dictionary (JSON)
        #[arg(long)]
        dictionary: PathBuf,
        /// Chapter directory (chNNN*.txt) or JSONL file
        #[arg(long)]
        chapters: PathBuf,
        /// Output directory for the artifacts
        #[arg(long)]
        out: PathBuf,
        /// Path to config file (JSON)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Also write events.json
        #[arg(long)]
        events: bool,
        /// Print the relationships of one character
        #[arg(long)]
        focus: Option<String>,
        /// Metric for the printed ranking
        #[arg(long, default_value = "weighted_degree")]
        rank_by: RankingMetric,
        /// Number of characters to print
        #[arg(long, default_value_t = 10)]
        top: usize,
    },

    /// Rank chapters by how often a character is mentioned.
    Chapters {
        /// Character dictionary (JSON)
        #[arg(long)]
        dictionary: PathBuf,
        /// Chapter directory (chNNN*.txt) or JSONL file
        #[arg(long)]
        chapters: PathBuf,
        /// Character id or alias
        #[arg(long)]
        character: String,
        /// Number of chapters to select
        #[arg(long, default_value_t = 20)]
        top: usize,
        /// Path to config file (JSON)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Resolve mentions to canonical characters.
    Resolve {
        /// Character dictionary (JSON)
        #[arg(long)]
        dictionary: PathBuf,
        /// Path to config file (JSON)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Mentions to resolve
        #[arg(required = true)]
        mentions: Vec<String>,
    },
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            dictionary,
            chapters,
            out,
            config,
            events,
            focus,
            rank_by,
            top,
        } => {
            cmd_analyze(
                &dictionary,
                &chapters,
                &out,
                config.as_deref(),
                events,
                focus.as_deref(),
                rank_by,
                top,
            )?;
        }
        Commands::Chapters {
            dictionary,
            chapters,
            character,
            top,
            config,
        } => {
            cmd_chapters(&dictionary, &chapters, &character, top, config.as_deref())?;
        }
        Commands::Resolve {
            dictionary,
            config,
            mentions,
        } => {
            cmd_resolve(&dictionary, config.as_deref(), &mentions)?;
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> anyhow::Result<CharnetConfig> {
    let config: CharnetConfig = match path {
        Some(path) => {
            let s = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            serde_json::from_str(&s)?
        }
        None => CharnetConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

fn load_registry(path: &Path, config: &CharnetConfig) -> anyhow::Result<CharacterRegistry> {
    let dictionary = CharacterDictionary::from_path(path)
        .with_context(|| format!("Failed to load dictionary {}", path.display()))?;
    Ok(CharacterRegistry::from_dictionary(dictionary, &config.registry)?)
}

#[allow(clippy::too_many_arguments)]
fn cmd_analyze(
    dictionary: &Path,
    chapters: &Path,
    out: &Path,
    config_path: Option<&Path>,
    include_events: bool,
    focus: Option<&str>,
    rank_by: RankingMetric,
    top: usize,
) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let registry = load_registry(dictionary, &config)?;
    println!(
        "Loaded {} characters ({} aliases)",
        registry.len(),
        registry.alias_count()
    );

    let pipeline = AnalysisPipeline::new(config.clone(), &registry)?;
    let output = pipeline.run(open_chapters(chapters)?)?;

    let summary = &output.report.summary;
    println!(
        "Network: {} characters, {} pairs, density {:.3}, {} communities (Q = {:.3})",
        summary.node_count,
        summary.edge_count,
        summary.density,
        summary.community_count,
        summary.modularity
    );
    match summary.average_path_length {
        Some(length) => println!("Average path length: {:.4}", length),
        None => println!("Average path length: n/a (network is not connected)"),
    }
    println!(
        "Diagnostics: {} segments, {} events, {} crowd scenes, {} unresolved speakers, {} failed chapters",
        output.diagnostics.segments,
        output.diagnostics.events,
        output.diagnostics.crowd_scene_count(),
        output.diagnostics.unresolved_speakers,
        output.diagnostics.failures.len()
    );

    println!("Top {} by {}:", top, rank_by);
    for (i, c) in output.report.ranked_by(rank_by).into_iter().take(top).enumerate() {
        println!("  {:2}. {} ({}): {:.4}", i + 1, c.name, c.id, rank_by.value(c));
    }

    if let Some(mention) = focus {
        match registry
            .resolve(mention)
            .and_then(|key| FocalView::new(&output.graph, &output.report, key))
        {
            Some(view) => {
                println!(
                    "{} ({}): degree {}, weighted degree {:.1}, community {}",
                    view.character.name,
                    view.character.id,
                    view.character.degree,
                    view.character.weighted_degree,
                    view.character.community
                );
                for n in view.top(top) {
                    println!(
                        "  {} ({}): weight {:.1}, {} segments, {} dialogue, {} action",
                        n.name, n.id, n.weight, n.segment_count, n.dialogue_events, n.action_events
                    );
                    if let Some(context) = &n.context {
                        println!("      \"{}\"", context);
                    }
                }
            }
            None => println!("No interactions found for '{}'", mention),
        }
    }

    let metadata = persistence::ArtifactMetadata::new(&config, &registry, &output);
    persistence::save_artifacts(out, &metadata, &registry, &output, include_events)?;
    println!("Artifacts saved to {}", out.display());
    Ok(())
}

fn cmd_chapters(
    dictionary: &Path,
    chapters: &Path,
    character: &str,
    top: usize,
    config_path: Option<&Path>,
) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let registry = load_registry(dictionary, &config)?;
    let id = registry
        .resolve_id(character)
        .with_context(|| format!("'{}' is not a known character", character))?
        .to_string();

    let pipeline = AnalysisPipeline::new(config, &registry)?;
    let output = pipeline.run(open_chapters(chapters)?)?;

    let ranked = rank_chapters(&output.chapters, &id, top);
    println!("Top {} chapters for {}:", ranked.len(), id);
    for r in &ranked {
        println!(
            "  chapter {:3}: {:3} mentions ({:.2} per 1000 chars)",
            r.chapter, r.mentions, r.density
        );
    }
    Ok(())
}

fn cmd_resolve(dictionary: &Path, config_path: Option<&Path>, mentions: &[String]) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let registry = load_registry(dictionary, &config)?;
    for mention in mentions {
        match registry.resolve(mention) {
            Some(key) => {
                let c = registry.character(key);
                println!("{} -> {} ({})", mention, c.id, c.name);
            }
            None => println!("{} -> (unknown)", mention),
        }
    }
    Ok(())
}
