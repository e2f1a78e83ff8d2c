//! factgraph CLI - Command-line interface
//!
//! Usage:
//!   factgraph analyze <file> [--output graph.json]
//!   factgraph query <file> <question>
//!   factgraph eval <file> <gold.json>
//!
//! Every command accepts `--parsed parses.json` to replay stored parses
//! instead of calling the parse service.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use factgraph_core::{AppConfig, DocumentParser, EntityBuckets, EntityType, LoggingConfig, Triple};
use factgraph_extractor::metrics::{AggregateMetrics, EntityMetrics, TripleMetrics};
use factgraph_pipeline::{Analysis, HttpParser, Pipeline, PrecomputedParser};
use serde::Deserialize;

#[derive(Parser)]
#[command(name = "factgraph")]
#[command(about = "Extract facts from text into a queryable knowledge graph")]
#[command(version)]
struct Cli {
    /// TOML config file (environment variables take precedence)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// JSON file mapping text to precomputed parses
    #[arg(long, global = true)]
    parsed: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract entities and triples from a text file
    Analyze {
        /// Text file to analyze
        file: PathBuf,

        /// Write the full analysis as JSON
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Ask a question about a text file
    Query {
        /// Text file to analyze
        file: PathBuf,
        /// Question to ask
        question: String,
    },
    /// Score extraction against hand-labelled entities and triples
    Eval {
        /// Text file to analyze
        file: PathBuf,
        /// Gold JSON: {"entities": {...}, "triples": [...]}
        gold: PathBuf,
    },
}

/// Hand-labelled expectations for one text
#[derive(Debug, Deserialize)]
struct GoldStandard {
    #[serde(default)]
    entities: EntityBuckets,
    #[serde(default)]
    triples: Vec<Triple>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;
    init_tracing(&config.logging);

    let pipeline = build_pipeline(&config, cli.parsed.as_deref())?;

    match cli.command {
        Commands::Analyze { file, output } => {
            let analysis = analyze_file(&pipeline, &file)?;
            print_analysis(&analysis);

            if let Some(path) = output {
                let json = serde_json::to_string_pretty(&analysis.output)?;
                std::fs::write(&path, json)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                println!("\nAnalysis written to {}", path.display());
            }
        }
        Commands::Query { file, question } => {
            let analysis = analyze_file(&pipeline, &file)?;
            for answer in pipeline.answer(&analysis.graph, &question)? {
                println!("{answer}");
            }
        }
        Commands::Eval { file, gold } => {
            let analysis = analyze_file(&pipeline, &file)?;
            let content = std::fs::read_to_string(&gold)
                .with_context(|| format!("Failed to read {}", gold.display()))?;
            let gold: GoldStandard = serde_json::from_str(&content)
                .with_context(|| format!("Invalid gold file {}", gold.display()))?;

            let mut metrics = AggregateMetrics::default();
            metrics.add_document(
                &EntityMetrics::evaluate(&analysis.output.entities, &gold.entities),
                &TripleMetrics::evaluate(&analysis.output.triples, &gold.triples),
            );
            print!("{}", metrics.report());
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> anyhow::Result<AppConfig> {
    let config = match path {
        Some(path) => AppConfig::from_file(path)?.with_env_override()?,
        None => AppConfig::from_env()?,
    };
    Ok(config)
}

fn init_tracing(logging: &LoggingConfig) {
    // Logs go to stderr; stdout carries results.
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| logging.level.clone().into());
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if logging.json_format {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn build_pipeline(config: &AppConfig, parsed: Option<&Path>) -> anyhow::Result<Pipeline> {
    let parser: Arc<dyn DocumentParser> = match parsed {
        Some(path) => {
            let parser = PrecomputedParser::from_file(path)?;
            tracing::info!(parses = parser.len(), path = %path.display(), "Loaded precomputed parses");
            Arc::new(parser)
        }
        None => {
            tracing::info!(endpoint = %config.parser.endpoint, "Using parse service");
            Arc::new(HttpParser::from_config(&config.parser)?)
        }
    };
    Ok(Pipeline::with_config(parser, config))
}

fn analyze_file(pipeline: &Pipeline, file: &Path) -> anyhow::Result<Analysis> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let analysis = pipeline
        .analyze(&text)
        .with_context(|| format!("Failed to analyze {}", file.display()))?;
    Ok(analysis)
}

fn print_analysis(analysis: &Analysis) {
    let output = &analysis.output;

    println!("Entities:");
    for entity_type in EntityType::ALL {
        let names = output.entities.get(entity_type);
        if names.is_empty() {
            continue;
        }
        let names: Vec<&str> = names.iter().map(String::as_str).collect();
        println!("  {entity_type}: {}", names.join(", "));
    }

    if !output.date_classes.is_empty() {
        println!("\nDates:");
        for (date, class) in &output.date_classes {
            println!("  {date}: {class}");
        }
    }

    println!("\nTriples:");
    for triple in &output.triples {
        println!("  {triple}");
    }

    println!(
        "\nGraph: {} nodes, {} edges",
        analysis.graph.node_count(),
        analysis.graph.edge_count()
    );
}
