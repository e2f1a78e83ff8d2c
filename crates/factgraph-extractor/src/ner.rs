//! Named Entity Recognition (NER) module
//!
//! The parser already labels entity spans; this module only buckets them
//! by the recognized [`EntityType`]s and sub-classifies DATE entities.

use std::collections::BTreeMap;

use factgraph_core::{Document, EntityBuckets, EntityType};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::EntityExtractor;

// ============================================================================
// Entity collection
// ============================================================================

/// Buckets parser entity spans into PERSON, ORG, GPE and DATE.
///
/// Any other parser label (NORP, MONEY, ...) is dropped.
#[derive(Debug, Clone, Default)]
pub struct EntityCollector;

impl EntityCollector {
    pub fn new() -> Self {
        Self
    }
}

impl EntityExtractor for EntityCollector {
    fn extract(&self, document: &Document) -> EntityBuckets {
        let mut buckets = EntityBuckets::new();

        for span in &document.entities {
            if let Some(entity_type) = EntityType::from_label(&span.label) {
                buckets.insert(entity_type, span.text.clone());
            }
        }

        buckets
    }
}

// ============================================================================
// Date classification
// ============================================================================

/// Finer category of a DATE entity.
///
/// Serialized with the same labels as [`DateClass::as_str`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DateClass {
    #[serde(rename = "Year")]
    Year,
    #[serde(rename = "Month and Day")]
    MonthAndDay,
    #[serde(rename = "Relative Date")]
    RelativeDate,
    #[serde(rename = "Unknown")]
    Unknown,
}

impl DateClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Year => "Year",
            Self::MonthAndDay => "Month and Day",
            Self::RelativeDate => "Relative Date",
            Self::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for DateClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which form of the text a date rule is matched against
#[derive(Debug, Clone, Copy)]
enum MatchOn {
    Original,
    Lowercase,
}

/// Ordered, first-match-wins date rules.
///
/// Order: four-digit year, "Month D", relative phrase ("next week").
/// Anything else is [`DateClass::Unknown`].
pub struct DateClassifier {
    rules: Vec<(Regex, MatchOn, DateClass)>,
}

impl DateClassifier {
    pub fn new() -> Self {
        let mut classifier = Self { rules: Vec::new() };
        classifier.add_rule(r"^\d{4}$", MatchOn::Original, DateClass::Year);
        classifier.add_rule(
            r"^(January|February|March|April|May|June|July|August|September|October|November|December) \d{1,2}$",
            MatchOn::Original,
            DateClass::MonthAndDay,
        );
        classifier.add_rule(
            r"^(next|last|this) (week|month|year)",
            MatchOn::Lowercase,
            DateClass::RelativeDate,
        );
        classifier
    }

    fn add_rule(&mut self, pattern: &str, on: MatchOn, class: DateClass) {
        if let Ok(regex) = Regex::new(pattern) {
            self.rules.push((regex, on, class));
        }
    }

    /// Classify one DATE text
    pub fn classify(&self, text: &str) -> DateClass {
        let lowered = text.to_lowercase();
        self.rules
            .iter()
            .find(|(regex, on, _)| match on {
                MatchOn::Original => regex.is_match(text),
                MatchOn::Lowercase => regex.is_match(&lowered),
            })
            .map_or(DateClass::Unknown, |(_, _, class)| *class)
    }

    /// Classify every DATE entity in the buckets
    pub fn classify_all(&self, buckets: &EntityBuckets) -> BTreeMap<String, DateClass> {
        buckets
            .date
            .iter()
            .map(|d| (d.clone(), self.classify(d)))
            .collect()
    }
}

impl Default for DateClassifier {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================
