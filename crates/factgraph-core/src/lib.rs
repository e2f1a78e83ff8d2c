//! factgraph Core - Domain models, traits, and shared types
//!
//! This crate defines the core abstractions used throughout factgraph:
//! - Fact models (entity types, entity buckets, SVO triples)
//! - The parser contract consumed by the extraction pipeline
//! - Common error types
//! - Configuration management

pub mod config;
pub mod document;

pub use config::{AppConfig, ConfigError, LoggingConfig, NormalizerConfig, ParserConfig};
pub use document::{Document, DocumentParser, EntitySpan, Sentence, Token};

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Core error types for factgraph operations
#[derive(Error, Debug)]
pub enum FactGraphError {
    #[error("Input text is empty")]
    EmptyInput,

    #[error("Parser contract violated: {0}")]
    ParserContract(String),

    #[error("Parser error: {0}")]
    Parser(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, FactGraphError>;

// ============================================================================
// Entities
// ============================================================================

/// Named-entity types kept by the pipeline.
///
/// Parser labels outside this set are dropped on purpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EntityType {
    #[serde(rename = "PERSON")]
    Person,
    #[serde(rename = "ORG")]
    Org,
    #[serde(rename = "GPE")]
    Gpe,
    #[serde(rename = "DATE")]
    Date,
}

impl EntityType {
    /// All recognized types, in first-write-wins precedence order
    pub const ALL: [EntityType; 4] = [Self::Person, Self::Org, Self::Gpe, Self::Date];

    /// Get the parser label for this type
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Person => "PERSON",
            Self::Org => "ORG",
            Self::Gpe => "GPE",
            Self::Date => "DATE",
        }
    }

    /// Map a parser entity label to a recognized type
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "PERSON" => Some(Self::Person),
            "ORG" => Some(Self::Org),
            "GPE" => Some(Self::Gpe),
            "DATE" => Some(Self::Date),
            _ => None,
        }
    }
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A named entity detected in a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    /// Entity text as reported by the parser
    pub name: String,

    /// Recognized type
    #[serde(rename = "type")]
    pub entity_type: EntityType,
}

impl Entity {
    /// Create a new entity
    pub fn new(name: impl Into<String>, entity_type: EntityType) -> Self {
        Self {
            name: name.into(),
            entity_type,
        }
    }
}

/// Distinct entity names grouped by recognized type.
///
/// One field per [`EntityType`]; there is no way to create another category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityBuckets {
    #[serde(rename = "PERSON")]
    pub person: BTreeSet<String>,

    #[serde(rename = "ORG")]
    pub org: BTreeSet<String>,

    #[serde(rename = "GPE")]
    pub gpe: BTreeSet<String>,

    #[serde(rename = "DATE")]
    pub date: BTreeSet<String>,
}

impl EntityBuckets {
    /// Create empty buckets
    pub fn new() -> Self {
        Self::default()
    }

    /// Names recorded for a type
    pub fn get(&self, entity_type: EntityType) -> &BTreeSet<String> {
        match entity_type {
            EntityType::Person => &self.person,
            EntityType::Org => &self.org,
            EntityType::Gpe => &self.gpe,
            EntityType::Date => &self.date,
        }
    }

    /// Record a name under a type. Returns false if it was already present.
    pub fn insert(&mut self, entity_type: EntityType, name: impl Into<String>) -> bool {
        let bucket = match entity_type {
            EntityType::Person => &mut self.person,
            EntityType::Org => &mut self.org,
            EntityType::Gpe => &mut self.gpe,
            EntityType::Date => &mut self.date,
        };
        bucket.insert(name.into())
    }

    /// Builder-style insert, mostly for fixtures
    pub fn with(mut self, entity_type: EntityType, name: impl Into<String>) -> Self {
        self.insert(entity_type, name);
        self
    }

    /// Type of a name; the first bucket in PERSON, ORG, GPE, DATE order wins
    pub fn type_of(&self, name: &str) -> Option<EntityType> {
        EntityType::ALL
            .into_iter()
            .find(|t| self.get(*t).contains(name))
    }

    /// Every distinct name exactly once, typed by [`Self::type_of`]
    pub fn entities(&self) -> Vec<Entity> {
        EntityType::ALL
            .into_iter()
            .flat_map(|t| self.get(t).iter().map(move |name| (t, name)))
            .filter(|(t, name)| self.type_of(name) == Some(*t))
            .map(|(t, name)| Entity::new(name.clone(), t))
            .collect()
    }

    /// Total number of (type, name) pairs
    pub fn len(&self) -> usize {
        EntityType::ALL.iter().map(|t| self.get(*t).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ============================================================================
// Triples
// ============================================================================

/// A subject-verb-object fact (Subject, Verb lemma, Object)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Triple {
    /// Subject span
    pub subject: String,

    /// Verb lemma
    pub verb: String,

    /// Object span
    pub object: String,
}

impl Triple {
    /// Create a new triple
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

impl std::fmt::Display for Triple {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -[{}]-> {}", self.subject, self.verb, self.object)
    }
}

// ============================================================================
// Tests
// ============================================================================
