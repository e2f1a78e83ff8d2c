//! Parser clients
//!
//! [`HttpParser`] talks to a spaCy-style parse service over HTTP.
//! [`PrecomputedParser`] replays parses saved to a JSON file.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use factgraph_core::{Document, DocumentParser, FactGraphError, ParserConfig, Result};
use reqwest::blocking::Client;
use serde::Serialize;

// ============================================================================
// HTTP Parser
// ============================================================================

/// Parse service client
pub struct HttpParser {
    client: Client,
    endpoint: String,
}

#[derive(Debug, Serialize)]
struct ParseRequest<'a> {
    text: &'a str,
}

impl HttpParser {
    /// Create a new client with a request timeout
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FactGraphError::Parser(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    /// Create from config
    pub fn from_config(config: &ParserConfig) -> Result<Self> {
        Self::new(
            config.endpoint.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl DocumentParser for HttpParser {
    fn parse(&self, text: &str) -> Result<Document> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&ParseRequest { text })
            .send()
            .map_err(|e| FactGraphError::Parser(format!("Parse request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().unwrap_or_default();
            return Err(FactGraphError::Parser(format!(
                "Parse service returned {status}: {error_text}"
            )));
        }

        response
            .json::<Document>()
            .map_err(|e| FactGraphError::Parser(format!("Failed to decode parse response: {e}")))
    }
}

// ============================================================================
// Precomputed Parser
// ============================================================================

/// Serves stored parses keyed by their source text.
///
/// Keys are compared after trimming surrounding whitespace, so a file read
/// with a trailing newline still finds its parse.
#[derive(Debug, Clone, Default)]
pub struct PrecomputedParser {
    documents: HashMap<String, Document>,
}

impl PrecomputedParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one parse
    pub fn with_document(mut self, text: &str, document: Document) -> Self {
        self.insert(text, document);
        self
    }

    pub fn insert(&mut self, text: &str, document: Document) {
        self.documents.insert(text.trim().to_string(), document);
    }

    /// Load a JSON object mapping text to parsed documents
    pub fn from_json_str(json: &str) -> Result<Self> {
        let documents: HashMap<String, Document> =
            serde_json::from_str(json).context("Invalid precomputed parse file")?;

        let mut parser = Self::new();
        for (text, document) in documents {
            parser.insert(&text, document);
        }
        Ok(parser)
    }

    /// Load from a file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_json_str(&json)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl DocumentParser for PrecomputedParser {
    fn parse(&self, text: &str) -> Result<Document> {
        self.documents.get(text.trim()).cloned().ok_or_else(|| {
            FactGraphError::Parser(format!("No precomputed parse for text: {:?}", text.trim()))
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
