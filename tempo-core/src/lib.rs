//! # tempo-core
//!
//! Core types for tempo: shared data structures used across all crates.
//!
//! This crate provides:
//! - **Identity**: `Span`, `EventKey` (canonical `[start:end)` keys)
//! - **Merged records**: `Event`, `Argument`, `Relation`, `Provenance`
//! - **Graphs**: `DocumentGraph`, `Supergraph`
//! - **Source records**: `SourceCorpus`, `SourceDocument`, `SourceEvent`, `Mention`
//! - **Export**: Cypher and NetworkX views of a document graph
//!
//! All other crates in the tempo workspace depend on `tempo-core` so that the
//! loader, the merger, and the reports agree on one data model.

pub mod error;
pub mod event;
pub mod export;
pub mod graph;
pub mod source;
pub mod span;

pub use error::{Error, Result};
pub use event::{Argument, Event, Provenance, Relation};
pub use export::{GraphDocument, GraphEdge, GraphExportFormat, GraphNode};
pub use graph::{DocumentGraph, GraphStats, Supergraph};
pub use source::{Mention, MentionArgument, SourceCorpus, SourceDocument, SourceEvent, SourceKind};
pub use span::{EventKey, Span};
