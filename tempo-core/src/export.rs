//! Export a merged document graph to graph-database formats.
//!
//! ```rust
//! use tempo_core::export::{GraphDocument, GraphExportFormat};
//! use tempo_core::{DocumentGraph, Event};
//!
//! let mut doc = DocumentGraph::new();
//! doc.insert("[0:1)".into(), Event::new("attacked"));
//!
//! let graph = GraphDocument::from_document_graph(&doc);
//! let cypher = graph.export(GraphExportFormat::Cypher).unwrap();
//! assert!(cypher.contains("CREATE"));
//! ```

use crate::error::Result;
use crate::graph::DocumentGraph;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Node label used when no source typed the event.
const UNTYPED_EVENT: &str = "Event";
/// Edge label used when a relation carries no label of its own.
const UNLABELED_RELATION: &str = "TEMPORAL";

/// A node in the exported graph (one per event).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    /// Event key
    pub id: String,
    /// Event type, or a generic label
    pub node_type: String,
    /// Trigger text
    pub name: String,
    /// Additional properties
    #[serde(default)]
    pub properties: BTreeMap<String, serde_json::Value>,
}

impl GraphNode {
    /// Create a new graph node.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        node_type: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            node_type: node_type.into(),
            name: name.into(),
            properties: BTreeMap::new(),
        }
    }

    /// Add a property to the node.
    #[must_use]
    pub fn with_property(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }
}

/// An edge in the exported graph (one per stored relation).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    /// Source event key
    pub source: String,
    /// Target event key
    pub target: String,
    /// Relation label
    pub relation: String,
    /// Confidence score (0.0 - 1.0)
    pub confidence: f64,
    /// Additional properties
    #[serde(default)]
    pub properties: BTreeMap<String, serde_json::Value>,
}

impl GraphEdge {
    /// Create a new graph edge.
    #[must_use]
    pub fn new(
        source: impl Into<String>,
        target: impl Into<String>,
        relation: impl Into<String>,
        confidence: f64,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            relation: relation.into(),
            confidence,
            properties: BTreeMap::new(),
        }
    }

    /// Add a property to the edge.
    #[must_use]
    pub fn with_property(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }
}

/// A flattened node/edge view of one document graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphDocument {
    /// Nodes (events)
    pub nodes: Vec<GraphNode>,
    /// Edges (relations)
    pub edges: Vec<GraphEdge>,
}

/// Supported graph export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphExportFormat {
    /// Neo4j Cypher CREATE statements
    Cypher,
    /// NetworkX-compatible JSON (node_link_graph format)
    NetworkXJson,
}

impl GraphDocument {
    /// Flatten a document graph.
    ///
    /// Relations reported by several sources become parallel edges, each
    /// tagged with its reporting source.
    #[must_use]
    pub fn from_document_graph(doc: &DocumentGraph) -> Self {
        let mut graph = Self::default();

        for (key, event) in doc {
            let sources: Vec<&str> = event.provenance.sources().into_iter().collect();
            graph.nodes.push(
                GraphNode::new(
                    key.as_str(),
                    event.event_type.as_deref().unwrap_or(UNTYPED_EVENT),
                    &event.text,
                )
                .with_property("sources", sources.join(","))
                .with_property("discoveries", event.provenance.len()),
            );

            for (source, relations) in &event.relations {
                for relation in relations {
                    graph.edges.push(
                        GraphEdge::new(
                            relation.event1_id.as_str(),
                            relation.event2_id.as_str(),
                            relation.label().unwrap_or(UNLABELED_RELATION),
                            relation.confidence,
                        )
                        .with_property("reported_by", source.as_str()),
                    );
                }
            }
        }

        graph
    }

    /// Export to Neo4j Cypher statements.
    ///
    /// Edges whose target event is absent from the graph still produce a
    /// `MATCH`, which simply matches nothing.
    #[must_use]
    pub fn to_cypher(&self) -> String {
        let mut cypher = String::new();

        for (idx, node) in self.nodes.iter().enumerate() {
            cypher.push_str(&format!(
                "CREATE (n{}:{} {{id: '{}', name: '{}'{}}});\n",
                idx,
                sanitize_cypher_name(&node.node_type),
                escape_cypher_string(&node.id),
                escape_cypher_string(&node.name),
                format_cypher_props(&node.properties),
            ));
        }

        cypher.push('\n');

        for edge in &self.edges {
            cypher.push_str(&format!(
                "MATCH (a {{id: '{}'}}), (b {{id: '{}'}}) CREATE (a)-[:{} {{confidence: {:.3}{}}}]->(b);\n",
                escape_cypher_string(&edge.source),
                escape_cypher_string(&edge.target),
                sanitize_cypher_name(&edge.relation),
                edge.confidence,
                format_cypher_props(&edge.properties),
            ));
        }

        cypher
    }

    /// Export to NetworkX node-link JSON.
    pub fn to_networkx_json(&self) -> Result<String> {
        #[derive(Serialize)]
        struct NetworkXGraph<'a> {
            directed: bool,
            multigraph: bool,
            nodes: Vec<NetworkXNode<'a>>,
            links: Vec<NetworkXLink<'a>>,
        }

        #[derive(Serialize)]
        struct NetworkXNode<'a> {
            id: &'a str,
            #[serde(rename = "type")]
            node_type: &'a str,
            name: &'a str,
            #[serde(flatten)]
            properties: &'a BTreeMap<String, serde_json::Value>,
        }

        #[derive(Serialize)]
        struct NetworkXLink<'a> {
            source: &'a str,
            target: &'a str,
            relation: &'a str,
            confidence: f64,
            #[serde(flatten)]
            properties: &'a BTreeMap<String, serde_json::Value>,
        }

        let graph = NetworkXGraph {
            directed: true,
            multigraph: true,
            nodes: self
                .nodes
                .iter()
                .map(|n| NetworkXNode {
                    id: &n.id,
                    node_type: &n.node_type,
                    name: &n.name,
                    properties: &n.properties,
                })
                .collect(),
            links: self
                .edges
                .iter()
                .map(|e| NetworkXLink {
                    source: &e.source,
                    target: &e.target,
                    relation: &e.relation,
                    confidence: e.confidence,
                    properties: &e.properties,
                })
                .collect(),
        };

        Ok(serde_json::to_string_pretty(&graph)?)
    }

    /// Export to the specified format.
    pub fn export(&self, format: GraphExportFormat) -> Result<String> {
        match format {
            GraphExportFormat::Cypher => Ok(self.to_cypher()),
            GraphExportFormat::NetworkXJson => self.to_networkx_json(),
        }
    }
}

/// Format extra properties as a Cypher map tail (`, key: value, ...`).
fn format_cypher_props(props: &BTreeMap<String, serde_json::Value>) -> String {
    let mut out = String::new();
    for (key, value) in props {
        let formatted = match value {
            serde_json::Value::String(s) => format!("'{}'", escape_cypher_string(s)),
            serde_json::Value::Number(n) => n.to_string(),
            serde_json::Value::Bool(b) => b.to_string(),
            _ => continue,
        };
        out.push_str(&format!(", {}: {}", sanitize_cypher_name(key), formatted));
    }
    out
}

/// Escape special characters in Cypher strings.
fn escape_cypher_string(s: &str) -> String {
    s.replace('\\', "\\\\").replace('\'', "\\'")
}

/// Sanitize names for Cypher identifiers.
fn sanitize_cypher_name(s: &str) -> String {
    s.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
