//! factgraph Pipeline - End-to-end text analysis
//!
//! Runs one document through every stage in order:
//! parse, entity collection, SVO extraction, span normalization,
//! coreference resolution and graph assembly.
//!
//! The parser is injected, so a [`Pipeline`] holds no global state and
//! every [`Pipeline::analyze`] call builds a fresh graph.
//!
//! Author: hephaex@gmail.com

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use factgraph_core::{
    AppConfig, Document, DocumentParser, EntityBuckets, FactGraphError, Result, Triple,
};
use factgraph_extractor::{
    CoreferenceResolver, DateClass, DateClassifier, EntityCollector, EntityExtractor,
    RelationExtractor, SpanNormalizer, SvoExtractor,
};
use factgraph_graph::{GraphBuilder, GraphQueryEngine, GraphSnapshot, KnowledgeGraph};
use serde::{Deserialize, Serialize};

pub mod parser;

pub use parser::{HttpParser, PrecomputedParser};

// ============================================================================
// Output
// ============================================================================

/// Serializable result of one analysis
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisOutput {
    /// Entity names grouped by type
    pub entities: EntityBuckets,

    /// Category of every DATE entity
    pub date_classes: BTreeMap<String, DateClass>,

    /// Resolved triples in document order
    pub triples: Vec<Triple>,

    /// Graph nodes and edges
    pub graph: GraphSnapshot,
}

/// Analysis output plus the live graph for querying
#[derive(Debug, Clone)]
pub struct Analysis {
    pub output: AnalysisOutput,
    pub graph: KnowledgeGraph,
}

// ============================================================================
// Pipeline
// ============================================================================

/// Text-to-graph pipeline
pub struct Pipeline {
    parser: Arc<dyn DocumentParser>,
    entities: EntityCollector,
    dates: DateClassifier,
    relations: SvoExtractor,
    normalizer: SpanNormalizer,
    resolver: CoreferenceResolver,
    builder: GraphBuilder,
    query: GraphQueryEngine,
}

impl Pipeline {
    /// Create a pipeline with default settings
    pub fn new(parser: Arc<dyn DocumentParser>) -> Self {
        Self::with_config(parser, &AppConfig::default())
    }

    /// Create a pipeline with the given parser and settings
    pub fn with_config(parser: Arc<dyn DocumentParser>, config: &AppConfig) -> Self {
        Self {
            parser,
            entities: EntityCollector::new(),
            dates: DateClassifier::new(),
            relations: SvoExtractor::new(),
            normalizer: SpanNormalizer::with_config(&config.normalizer),
            resolver: CoreferenceResolver::new(),
            builder: GraphBuilder::new(),
            query: GraphQueryEngine::new(),
        }
    }

    /// Create a pipeline backed by the configured parse service
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        config.validate()?;
        let parser = HttpParser::from_config(&config.parser)?;
        Ok(Self::with_config(Arc::new(parser), config))
    }

    /// Parse and analyze one text.
    ///
    /// Blank text and parses that break the parser contract are errors;
    /// everything else degrades to fewer facts.
    pub fn analyze(&self, text: &str) -> Result<Analysis> {
        if text.trim().is_empty() {
            return Err(FactGraphError::EmptyInput);
        }

        let start_time = Instant::now();

        let document = self.parser.parse(text)?;
        document.validate(text)?;
        tracing::info!(sentences = document.sentences.len(), "Text parsed");

        let analysis = self.analyze_document(&document);

        tracing::info!(
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "Analysis complete"
        );
        Ok(analysis)
    }

    /// Analyze an already-parsed document
    pub fn analyze_document(&self, document: &Document) -> Analysis {
        let entities = self.entities.extract(document);
        tracing::info!(entities = entities.len(), "Entities collected");

        let raw = self.relations.extract(document);
        tracing::info!(triples = raw.len(), "Relations extracted");

        let normalized = self.normalizer.normalize_all(&raw);
        tracing::info!(
            triples = normalized.len(),
            dropped = raw.len() - normalized.len(),
            "Spans normalized"
        );

        let triples = self.resolver.resolve(&normalized, &entities);
        tracing::info!(triples = triples.len(), "Coreferences resolved");

        let graph = self.builder.build(&entities, &triples);
        tracing::info!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "Graph built"
        );

        let output = AnalysisOutput {
            date_classes: self.dates.classify_all(&entities),
            graph: graph.snapshot(),
            entities,
            triples,
        };

        Analysis { output, graph }
    }

    /// Answer a question against a graph from [`Pipeline::analyze`]
    pub fn answer(&self, graph: &KnowledgeGraph, question: &str) -> Result<Vec<String>> {
        if question.trim().is_empty() {
            return Err(FactGraphError::EmptyInput);
        }
        self.query.answer(graph, self.parser.as_ref(), question)
    }
}

// ============================================================================
// Tests
// ============================================================================
