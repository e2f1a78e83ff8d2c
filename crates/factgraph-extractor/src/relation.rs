//! Relation Extraction (RE) module
//!
//! Extracts subject-verb-object triples from dependency parses.

use factgraph_core::{Document, Sentence};

use crate::{RawTriple, RelationExtractor};

/// Dependency roles that mark a verb's subject
pub const SUBJECT_ROLES: &[&str] = &["nsubj", "nsubjpass", "csubj"];

/// Dependency roles that mark a verb's object or complement
pub const OBJECT_ROLES: &[&str] = &["dobj", "attr", "pobj", "xcomp", "ccomp", "obl"];

/// Dependency roles of auxiliary verbs, which never head a triple
pub const AUXILIARY_ROLES: &[&str] = &["aux", "auxpass"];

/// Dependency-based SVO extractor.
///
/// For every non-auxiliary verb, the last subject-role child and the last
/// object-role child are expanded to their full subtrees.
#[derive(Debug, Clone, Default)]
pub struct SvoExtractor;

impl SvoExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Triples for a single sentence, in verb order
    pub fn extract_sentence(&self, sentence: &Sentence) -> Vec<RawTriple> {
        let mut triples = Vec::new();

        for (index, token) in sentence.tokens.iter().enumerate() {
            if !token.is_verb() || AUXILIARY_ROLES.contains(&token.dep.as_str()) {
                continue;
            }

            let mut subject = None;
            let mut object = None;

            // Last candidate of each kind wins.
            for (child_index, child) in sentence.children(index) {
                if SUBJECT_ROLES.contains(&child.dep.as_str()) {
                    subject = Some(child_index);
                }
                if OBJECT_ROLES.contains(&child.dep.as_str()) {
                    object = Some(child_index);
                }
            }

            let (Some(subject), Some(object)) = (subject, object) else {
                continue;
            };

            let subject_span = sentence.subtree_text(subject);
            let object_span = sentence.subtree_text(object);

            if !subject_span.is_empty() && !object_span.is_empty() {
                triples.push(RawTriple::new(
                    subject_span,
                    token.lemma.clone(),
                    object_span,
                ));
            }
        }

        triples
    }
}

impl RelationExtractor for SvoExtractor {
    fn extract(&self, document: &Document) -> Vec<RawTriple> {
        document
            .sentences
            .iter()
            .flat_map(|s| self.extract_sentence(s))
            .collect()
    }
}

// ============================================================================
// Tests
// ============================================================================
