//! Parser contract
//!
//! The pipeline never parses text itself. A [`DocumentParser`] returns a
//! [`Document`]: sentences of tokens carrying POS tags, dependency labels,
//! lemmas and child links, plus the document's named-entity spans.

use serde::{Deserialize, Serialize};

use crate::{FactGraphError, Result};

/// Parser client consumed by the pipeline and the query engine
pub trait DocumentParser: Send + Sync {
    /// Parse raw text into sentences, tokens and entity spans
    fn parse(&self, text: &str) -> Result<Document>;
}

/// A parsed document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Sentences in document order
    pub sentences: Vec<Sentence>,

    /// Named-entity spans for the whole document
    #[serde(default)]
    pub entities: Vec<EntitySpan>,
}

impl Document {
    /// Create a document from sentences and entity spans
    pub fn new(sentences: Vec<Sentence>, entities: Vec<EntitySpan>) -> Self {
        Self {
            sentences,
            entities,
        }
    }

    /// Iterate over all tokens in document order
    pub fn tokens(&self) -> impl Iterator<Item = (&Sentence, usize, &Token)> {
        self.sentences
            .iter()
            .flat_map(|s| s.tokens.iter().enumerate().map(move |(i, t)| (s, i, t)))
    }

    /// Check the structural guarantees the pipeline relies on.
    ///
    /// Non-blank source text must produce at least one sentence, and every
    /// sentence's child links must form a forest over its own tokens.
    pub fn validate(&self, source_text: &str) -> Result<()> {
        if self.sentences.is_empty() && !source_text.trim().is_empty() {
            return Err(FactGraphError::ParserContract(
                "no sentences returned for non-empty text".to_string(),
            ));
        }

        for (sent_idx, sentence) in self.sentences.iter().enumerate() {
            let len = sentence.tokens.len();
            let mut has_parent = vec![false; len];

            for (tok_idx, token) in sentence.tokens.iter().enumerate() {
                for &child in &token.children {
                    if child >= len {
                        return Err(FactGraphError::ParserContract(format!(
                            "sentence {sent_idx}: token {tok_idx} has child {child} out of range ({len} tokens)"
                        )));
                    }
                    if child == tok_idx {
                        return Err(FactGraphError::ParserContract(format!(
                            "sentence {sent_idx}: token {tok_idx} lists itself as a child"
                        )));
                    }
                    if has_parent[child] {
                        return Err(FactGraphError::ParserContract(format!(
                            "sentence {sent_idx}: token {child} has more than one head"
                        )));
                    }
                    has_parent[child] = true;
                }
            }

            // With single heads, a token unreachable from every root sits on a cycle.
            let mut stack: Vec<usize> = (0..len).filter(|&i| !has_parent[i]).collect();
            let mut reached = 0;
            while let Some(current) = stack.pop() {
                reached += 1;
                stack.extend(sentence.tokens[current].children.iter().copied());
            }
            if reached != len {
                return Err(FactGraphError::ParserContract(format!(
                    "sentence {sent_idx}: child links contain a cycle"
                )));
            }
        }

        Ok(())
    }
}

/// One sentence of a parsed document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sentence {
    /// Tokens in surface order
    pub tokens: Vec<Token>,
}

impl Sentence {
    /// Create a sentence from tokens in surface order
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens }
    }

    /// Children of a token, in the order the parser reported them
    pub fn children(&self, index: usize) -> impl Iterator<Item = (usize, &Token)> {
        self.tokens
            .get(index)
            .map(|t| t.children.as_slice())
            .unwrap_or_default()
            .iter()
            .filter_map(|&c| self.tokens.get(c).map(|t| (c, t)))
    }

    /// Indices of the token and all of its descendants, in surface order
    pub fn subtree(&self, index: usize) -> Vec<usize> {
        if index >= self.tokens.len() {
            return Vec::new();
        }

        // Visited guard keeps unvalidated cyclic input from looping.
        let mut visited = vec![false; self.tokens.len()];
        let mut stack = vec![index];
        let mut out = Vec::new();

        while let Some(current) = stack.pop() {
            if std::mem::replace(&mut visited[current], true) {
                continue;
            }
            out.push(current);
            stack.extend(
                self.tokens[current]
                    .children
                    .iter()
                    .copied()
                    .filter(|&c| c < self.tokens.len()),
            );
        }

        out.sort_unstable();
        out
    }

    /// Text of a token's subtree, joined with single spaces
    pub fn subtree_text(&self, index: usize) -> String {
        self.subtree(index)
            .into_iter()
            .map(|i| self.tokens[i].text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// A single token with its syntactic annotations
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Surface text
    pub text: String,

    /// Base form
    pub lemma: String,

    /// Coarse part-of-speech tag (e.g. `VERB`, `PROPN`)
    pub pos: String,

    /// Dependency label relative to the head (e.g. `nsubj`, `dobj`)
    pub dep: String,

    /// Indices of direct children within the same sentence
    #[serde(default)]
    pub children: Vec<usize>,
}

impl Token {
    /// Create a token without children
    pub fn new(
        text: impl Into<String>,
        lemma: impl Into<String>,
        pos: impl Into<String>,
        dep: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            lemma: lemma.into(),
            pos: pos.into(),
            dep: dep.into(),
            children: Vec::new(),
        }
    }

    /// Set child indices
    pub fn with_children(mut self, children: impl IntoIterator<Item = usize>) -> Self {
        self.children = children.into_iter().collect();
        self
    }

    pub fn is_verb(&self) -> bool {
        self.pos == "VERB"
    }
}

/// A named-entity span reported by the parser
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySpan {
    /// Entity text
    pub text: String,

    /// Parser label (e.g. `PERSON`, `ORG`, `NORP`)
    pub label: String,
}

impl EntitySpan {
    pub fn new(text: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            label: label.into(),
        }
    }
}
