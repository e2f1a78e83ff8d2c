//! Span normalization
//!
//! Cleans the subject and object spans of raw triples before they are
//! trusted downstream. Cleanup runs as an ordered rule list:
//!
//! 1. [`CleanupRule::StripEdges`]: trim whitespace, quotes and commas
//! 2. [`CleanupRule::TruncateRelativeClause`]: cut at `, which` / `, that` / ...
//! 3. [`CleanupRule::CollapseWhitespace`]: single spaces between tokens
//! 4. [`CleanupRule::RemoveFillers`]: drop filler phrases such as `"moreover "`
//!
//! The rule list repeats until the span stops changing, then long spans are
//! cut to `max_len` tokens and empty objects become [`UNSPECIFIED`].

use factgraph_core::{NormalizerConfig, Triple};

use crate::RawTriple;

/// Object placeholder used when nothing meaningful is left
pub const UNSPECIFIED: &str = "(unspecified)";

/// Marker appended to spans cut at `max_len` tokens
pub const ELLIPSIS: &str = "...";

const QUOTES: &[char] = &['"', '\'', '`', '\u{201C}', '\u{201D}', '\u{2018}', '\u{2019}'];

const RELATIVE_MARKERS: &[&str] = &["which", "that", "who", "however", "although"];

const FILLERS: &[&str] = &["that ", "who ", "however ", "moreover ", "it to have "];

/// Object spans that carry no content
const PLACEHOLDER_OBJECTS: &[&str] = &["", "()", "( )", "[]", "\"\"", "''"];

/// Verbs whose placeholder objects are noise rather than signal
const UNRELIABLE_VERBS: &[&str] = &["say", "write", "expect"];

/// One step of span cleanup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanupRule {
    StripEdges,
    TruncateRelativeClause,
    CollapseWhitespace,
    RemoveFillers,
}

/// Order in which cleanup rules are applied
pub const CLEANUP_ORDER: [CleanupRule; 4] = [
    CleanupRule::StripEdges,
    CleanupRule::TruncateRelativeClause,
    CleanupRule::CollapseWhitespace,
    CleanupRule::RemoveFillers,
];

/// Why a raw triple did not survive normalization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Nothing left of the subject after cleanup
    EmptySubject,
    /// Placeholder object on a verb from the unreliable set
    UnreliableObject,
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptySubject => write!(f, "empty subject"),
            Self::UnreliableObject => write!(f, "placeholder object on unreliable verb"),
        }
    }
}

/// Cleans, truncates and validates triple spans
pub struct SpanNormalizer {
    max_len: usize,
}

impl SpanNormalizer {
    /// Create a normalizer with the default `max_len` of 8
    pub fn new() -> Self {
        Self::with_config(&NormalizerConfig::default())
    }

    /// Create from config
    pub fn with_config(config: &NormalizerConfig) -> Self {
        Self {
            // Zero would turn every span into a bare ellipsis.
            max_len: config.max_len.max(1),
        }
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    fn apply(&self, rule: CleanupRule, span: &str) -> String {
        match rule {
            CleanupRule::StripEdges => span
                .trim_matches(|c: char| c.is_whitespace() || c == ',' || QUOTES.contains(&c))
                .to_string(),
            CleanupRule::TruncateRelativeClause => match relative_clause_start(span) {
                Some(comma) => span[..comma].to_string(),
                None => span.to_string(),
            },
            CleanupRule::CollapseWhitespace => span.split_whitespace().collect::<Vec<_>>().join(" "),
            CleanupRule::RemoveFillers => FILLERS
                .iter()
                .fold(span.to_string(), |acc, filler| acc.replace(filler, "")),
        }
    }

    fn cleanup(&self, span: &str) -> String {
        let mut current = span.to_string();
        loop {
            let next = CLEANUP_ORDER
                .iter()
                .fold(current.clone(), |acc, rule| self.apply(*rule, &acc));
            if next == current {
                return current;
            }
            current = next;
        }
    }

    /// Clean a span and bound it to `max_len` tokens
    pub fn normalize_span(&self, span: &str) -> String {
        let cleaned = self.cleanup(span);
        let tokens: Vec<&str> = cleaned.split_whitespace().collect();

        if tokens.len() <= self.max_len {
            return cleaned;
        }

        let mut truncated = tokens[..self.max_len].join(" ");
        truncated.push_str(ELLIPSIS);
        truncated
    }

    /// Normalize an object span; the flag is set when the placeholder was used
    pub fn normalize_object(&self, span: &str) -> (String, bool) {
        let normalized = self.normalize_span(span);
        if PLACEHOLDER_OBJECTS.contains(&normalized.as_str()) {
            (UNSPECIFIED.to_string(), true)
        } else {
            (normalized, false)
        }
    }

    /// Normalize both spans of a raw triple
    pub fn normalize_triple(&self, raw: &RawTriple) -> Result<Triple, Rejection> {
        let subject = self.normalize_span(&raw.subject);
        if subject.is_empty() {
            return Err(Rejection::EmptySubject);
        }

        let (object, placeholder) = self.normalize_object(&raw.object);
        if placeholder && UNRELIABLE_VERBS.contains(&raw.verb.as_str()) {
            return Err(Rejection::UnreliableObject);
        }

        Ok(Triple::new(subject, raw.verb.clone(), object))
    }

    /// Normalize a batch, dropping rejected triples and keeping order
    pub fn normalize_all(&self, raws: &[RawTriple]) -> Vec<Triple> {
        raws.iter()
            .filter_map(|raw| match self.normalize_triple(raw) {
                Ok(triple) => Some(triple),
                Err(reason) => {
                    tracing::debug!(
                        subject = %raw.subject,
                        verb = %raw.verb,
                        object = %raw.object,
                        %reason,
                        "Dropping triple"
                    );
                    None
                }
            })
            .collect()
    }
}

/// Byte offset of the first comma followed by a relative marker word
fn relative_clause_start(span: &str) -> Option<usize> {
    span.match_indices(',').map(|(i, _)| i).find(|&i| {
        let word: String = span[i + 1..]
            .trim_start()
            .chars()
            .take_while(|c| c.is_alphanumeric() || *c == '_')
            .collect();
        RELATIVE_MARKERS
            .iter()
            .any(|marker| word.eq_ignore_ascii_case(marker))
    })
}

impl Default for SpanNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================
