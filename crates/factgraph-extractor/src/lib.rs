//! factgraph Extractor - Knowledge extraction pipeline
//!
//! Turns a parsed [`Document`] into facts:
//! entity buckets (NER), raw subject-verb-object triples (RE),
//! cleaned spans, and pronoun-resolved triples ready for the graph.

use factgraph_core::{Document, EntityBuckets};
use serde::{Deserialize, Serialize};

/// Triple as found in the parse, before span normalization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTriple {
    pub subject: String,
    pub verb: String,
    pub object: String,
}

impl RawTriple {
    pub fn new(
        subject: impl Into<String>,
        verb: impl Into<String>,
        object: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            verb: verb.into(),
            object: object.into(),
        }
    }
}

/// Trait for entity extractors
pub trait EntityExtractor: Send + Sync {
    fn extract(&self, document: &Document) -> EntityBuckets;
}

/// Trait for relation extractors
pub trait RelationExtractor: Send + Sync {
    fn extract(&self, document: &Document) -> Vec<RawTriple>;
}

pub mod coref;
pub mod metrics;
pub mod ner;
pub mod normalizer;
pub mod relation;

pub use coref::CoreferenceResolver;
pub use ner::{DateClass, DateClassifier, EntityCollector};
pub use normalizer::{Rejection, SpanNormalizer, UNSPECIFIED};
pub use relation::SvoExtractor;
