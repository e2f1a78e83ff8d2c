//! Factoid query answering
//!
//! A question is parsed with the same [`DocumentParser`] used for analysis,
//! reduced to a `(subject, relation)` pair and matched against every edge.

use factgraph_core::{Document, DocumentParser, Result, Sentence};

use crate::KnowledgeGraph;

/// Answer when no subject or verb can be found in the question
pub const NOT_UNDERSTOOD: &str = "Sorry, I couldn't understand the query.";

/// Answer when the question is understood but nothing matches
pub const NOT_FOUND: &str = "No information found for the given query.";

const SUBJECT_ROLES: &[&str] = &["nsubj", "pobj"];

/// Modifiers folded into the subject phrase ("Barack" in "Barack Obama")
const NAME_PART_ROLES: &[&str] = &["compound", "flat"];

/// Transient `(subject, relation)` pair extracted from a question
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub subject: String,
    pub relation: String,
}

impl Query {
    /// Extract a query from a parsed question.
    ///
    /// The first `nsubj`/`pobj` token and the first `VERB` token win.
    pub fn from_document(document: &Document) -> Option<Self> {
        let subject = document.sentences.iter().find_map(subject_phrase);
        let relation = document
            .tokens()
            .find(|(_, _, t)| t.is_verb())
            .map(|(_, _, t)| t.lemma.clone());

        Some(Self {
            subject: subject?,
            relation: relation?,
        })
    }
}

fn subject_phrase(sentence: &Sentence) -> Option<String> {
    let (index, token) = sentence
        .tokens
        .iter()
        .enumerate()
        .find(|(_, t)| SUBJECT_ROLES.contains(&t.dep.as_str()))?;

    let mut parts: Vec<(usize, &str)> = sentence
        .children(index)
        .filter(|(i, child)| *i < index && NAME_PART_ROLES.contains(&child.dep.as_str()))
        .map(|(i, child)| (i, child.text.as_str()))
        .collect();
    parts.push((index, token.text.as_str()));
    parts.sort_by_key(|(i, _)| *i);

    Some(
        parts
            .into_iter()
            .map(|(_, text)| text)
            .collect::<Vec<_>>()
            .join(" "),
    )
}

/// Answers questions against a [`KnowledgeGraph`]
#[derive(Debug, Clone, Copy, Default)]
pub struct GraphQueryEngine;

impl GraphQueryEngine {
    pub fn new() -> Self {
        Self
    }

    /// Parse a question and answer it. Never returns an empty list.
    pub fn answer(
        &self,
        graph: &KnowledgeGraph,
        parser: &dyn DocumentParser,
        question: &str,
    ) -> Result<Vec<String>> {
        let document = parser.parse(question)?;
        Ok(self.answer_document(graph, &document))
    }

    /// Answer an already-parsed question
    pub fn answer_document(&self, graph: &KnowledgeGraph, document: &Document) -> Vec<String> {
        let Some(query) = Query::from_document(document) else {
            tracing::debug!("No subject or verb in query");
            return vec![NOT_UNDERSTOOD.to_string()];
        };

        let subject = query.subject.to_lowercase();
        let answers: Vec<String> = graph
            .edges()
            .filter(|e| e.source.to_lowercase() == subject && e.label == query.relation)
            .map(|e| e.target.to_string())
            .collect();

        tracing::debug!(
            subject = %query.subject,
            relation = %query.relation,
            matches = answers.len(),
            "Query answered"
        );

        if answers.is_empty() {
            vec![NOT_FOUND.to_string()]
        } else {
            answers
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
