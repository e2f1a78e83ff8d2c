//! factgraph Graph - In-memory knowledge graph
//!
//! Assembles entities and resolved triples into a directed multigraph
//! (petgraph `DiGraph`) and answers simple factoid questions against it.
//! The graph is rebuilt for every analysis; nothing is persisted.

use std::collections::{BTreeMap, HashMap};

use factgraph_core::{EntityBuckets, EntityType, Triple};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};

pub mod query;

pub use query::{GraphQueryEngine, Query, NOT_FOUND, NOT_UNDERSTOOD};

/// Node payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeData {
    pub name: String,
    /// Unset when the node only appears as a triple endpoint
    pub entity_type: Option<EntityType>,
}

/// Edge payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeData {
    /// Verb lemma
    pub label: String,
}

/// Borrowed view of one edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeView<'a> {
    pub source: &'a str,
    pub target: &'a str,
    pub label: &'a str,
}

/// Directed multigraph of named nodes and verb-labelled edges
#[derive(Debug, Clone, Default)]
pub struct KnowledgeGraph {
    graph: DiGraph<NodeData, EdgeData>,
    index: HashMap<String, NodeIndex>,
}

impl KnowledgeGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node, or return the existing one.
    ///
    /// A type is recorded only if the node has none yet.
    pub fn add_node(&mut self, name: &str, entity_type: Option<EntityType>) -> NodeIndex {
        if let Some(&idx) = self.index.get(name) {
            let node = &mut self.graph[idx];
            if node.entity_type.is_none() {
                node.entity_type = entity_type;
            }
            return idx;
        }

        let idx = self.graph.add_node(NodeData {
            name: name.to_string(),
            entity_type,
        });
        self.index.insert(name.to_string(), idx);
        idx
    }

    /// Add one edge per triple. Existing edges are never merged or replaced.
    pub fn add_triple(&mut self, triple: &Triple) {
        let source = self.add_node(&triple.subject, None);
        let target = self.add_node(&triple.object, None);
        self.graph.add_edge(
            source,
            target,
            EdgeData {
                label: triple.verb.clone(),
            },
        );
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn contains_node(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Type of a node; `None` if missing or untyped
    pub fn node_type(&self, name: &str) -> Option<EntityType> {
        self.index
            .get(name)
            .and_then(|&idx| self.graph[idx].entity_type)
    }

    /// Node names in insertion order
    pub fn node_names(&self) -> impl Iterator<Item = &str> {
        self.graph.node_weights().map(|n| n.name.as_str())
    }

    /// Edges in insertion order
    pub fn edges(&self) -> impl Iterator<Item = EdgeView<'_>> {
        self.graph.edge_references().map(move |e| EdgeView {
            source: &self.graph[e.source()].name,
            target: &self.graph[e.target()].name,
            label: &e.weight().label,
        })
    }

    /// Outgoing edges of a node, in insertion order
    pub fn edges_from(&self, name: &str) -> Vec<EdgeView<'_>> {
        self.edges().filter(|e| e.source == name).collect()
    }

    /// Serializable copy for presentation and persistence layers
    pub fn snapshot(&self) -> GraphSnapshot {
        GraphSnapshot {
            nodes: self
                .graph
                .node_weights()
                .map(|n| {
                    (
                        n.name.clone(),
                        NodeAttributes {
                            entity_type: n.entity_type,
                        },
                    )
                })
                .collect(),
            edges: self
                .edges()
                .map(|e| EdgeRecord {
                    source: e.source.to_string(),
                    target: e.target.to_string(),
                    label: e.label.to_string(),
                })
                .collect(),
        }
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Assembles a [`KnowledgeGraph`] from entity buckets and resolved triples
#[derive(Debug, Clone, Copy, Default)]
pub struct GraphBuilder;

impl GraphBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Entities first (typed), then one edge per triple
    pub fn build(&self, entities: &EntityBuckets, triples: &[Triple]) -> KnowledgeGraph {
        let mut graph = KnowledgeGraph::new();

        for entity in entities.entities() {
            graph.add_node(&entity.name, Some(entity.entity_type));
        }
        for triple in triples {
            graph.add_triple(triple);
        }

        tracing::debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "Knowledge graph assembled"
        );
        graph
    }
}

// ============================================================================
// Snapshot
// ============================================================================

/// Node attributes in a snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeAttributes {
    #[serde(rename = "type")]
    pub entity_type: Option<EntityType>,
}

/// Edge in a snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub source: String,
    pub target: String,
    pub label: String,
}

/// Serializable graph: `{nodes: {name: {type}}, edges: [{source, target, label}]}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub nodes: BTreeMap<String, NodeAttributes>,
    pub edges: Vec<EdgeRecord>,
}

// ============================================================================
// Tests
// ============================================================================
