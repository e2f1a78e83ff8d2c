//! Quality Metrics module
//!
//! Scores extracted entities and triples against hand-labelled gold data
//! with precision, recall and F1.

use std::collections::HashSet;

use factgraph_core::{EntityBuckets, EntityType, Triple};
use serde::{Deserialize, Serialize};

// ============================================================================
// Counts
// ============================================================================

/// Confusion counts for one extraction task
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counts {
    /// Predicted items also in the gold set
    pub true_positives: usize,
    /// Predicted items missing from the gold set
    pub false_positives: usize,
    /// Gold items that were not predicted
    pub false_negatives: usize,
}

impl Counts {
    fn from_sets<T: Eq + std::hash::Hash>(predicted: &HashSet<T>, gold: &HashSet<T>) -> Self {
        let true_positives = predicted.intersection(gold).count();
        Self {
            true_positives,
            false_positives: predicted.len() - true_positives,
            false_negatives: gold.len() - true_positives,
        }
    }

    /// Calculate precision (TP / (TP + FP))
    pub fn precision(&self) -> f32 {
        if self.true_positives + self.false_positives == 0 {
            0.0
        } else {
            self.true_positives as f32 / (self.true_positives + self.false_positives) as f32
        }
    }

    /// Calculate recall (TP / (TP + FN))
    pub fn recall(&self) -> f32 {
        if self.true_positives + self.false_negatives == 0 {
            0.0
        } else {
            self.true_positives as f32 / (self.true_positives + self.false_negatives) as f32
        }
    }

    /// Calculate F1 score (2 * P * R / (P + R))
    pub fn f1_score(&self) -> f32 {
        let p = self.precision();
        let r = self.recall();
        if p + r == 0.0 {
            0.0
        } else {
            2.0 * p * r / (p + r)
        }
    }

    fn add(&mut self, other: &Counts) {
        self.true_positives += other.true_positives;
        self.false_positives += other.false_positives;
        self.false_negatives += other.false_negatives;
    }
}

// ============================================================================
// Entity / Triple evaluation
// ============================================================================

/// Entity extraction score; a match needs the same name and type
pub struct EntityMetrics;

impl EntityMetrics {
    pub fn evaluate(predicted: &EntityBuckets, gold: &EntityBuckets) -> Counts {
        let flatten = |buckets: &EntityBuckets| -> HashSet<(EntityType, String)> {
            EntityType::ALL
                .into_iter()
                .flat_map(|t| buckets.get(t).iter().map(move |n| (t, n.clone())))
                .collect()
        };
        Counts::from_sets(&flatten(predicted), &flatten(gold))
    }
}

/// Triple extraction score.
///
/// Subjects and objects compare case-insensitively, verbs exactly.
pub struct TripleMetrics;

impl TripleMetrics {
    pub fn evaluate(predicted: &[Triple], gold: &[Triple]) -> Counts {
        let key = |t: &Triple| (t.subject.to_lowercase(), t.verb.clone(), t.object.to_lowercase());
        let predicted: HashSet<_> = predicted.iter().map(key).collect();
        let gold: HashSet<_> = gold.iter().map(key).collect();
        Counts::from_sets(&predicted, &gold)
    }
}

// ============================================================================
// Aggregate Metrics
// ============================================================================

/// Aggregate metrics for a batch of evaluated documents
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AggregateMetrics {
    pub entities: Counts,
    pub triples: Counts,
    pub num_documents: usize,
}

impl AggregateMetrics {
    /// Add one document's scores
    pub fn add_document(&mut self, entities: &Counts, triples: &Counts) {
        self.entities.add(entities);
        self.triples.add(triples);
        self.num_documents += 1;
    }

    /// Summary report
    pub fn report(&self) -> String {
        format!(
            "=== Extraction Quality Report ===\n\n\
             Documents evaluated: {}\n\n\
             Entities:\n\
               Precision: {:.1}%\n\
               Recall:    {:.1}%\n\
               F1 Score:  {:.1}%\n\
               TP: {} | FP: {} | FN: {}\n\n\
             Triples:\n\
               Precision: {:.1}%\n\
               Recall:    {:.1}%\n\
               F1 Score:  {:.1}%\n\
               TP: {} | FP: {} | FN: {}\n",
            self.num_documents,
            self.entities.precision() * 100.0,
            self.entities.recall() * 100.0,
            self.entities.f1_score() * 100.0,
            self.entities.true_positives,
            self.entities.false_positives,
            self.entities.false_negatives,
            self.triples.precision() * 100.0,
            self.triples.recall() * 100.0,
            self.triples.f1_score() * 100.0,
            self.triples.true_positives,
            self.triples.false_positives,
            self.triples.false_negatives,
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
