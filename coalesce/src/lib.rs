//! # tempo-coalesce
//!
//! Fold per-source event records into one provenance-tagged supergraph.
//!
//! Merging runs in two phases. [`Merger::merge_events`] collapses every
//! source's events onto their canonical keys; only then does
//! [`Merger::merge_relations`] attach relations, so a relation can anchor on
//! an event that a different source discovered.
//!
//! # Example
//!
//! ```
//! use tempo_coalesce::Merger;
//! use tempo_core::{SourceCorpus, SourceDocument, SourceEvent, SourceKind};
//!
//! let tbd = SourceCorpus::new("tear-tbd", SourceKind::Temporal).with_document(
//!     "d1",
//!     SourceDocument::with_events(vec![SourceEvent::Temporal {
//!         event_id: "[0:1)".into(),
//!         text: "fled".into(),
//!         arguments: vec![],
//!     }]),
//! );
//!
//! let merged = Merger::new().merge(&[tbd]).unwrap();
//! assert_eq!(merged.supergraph.stats().events, 1);
//! ```

#![warn(missing_docs)]

pub mod merger;

pub use merger::{
    merge_event, DanglingRelation, EventContribution, EventGraph, MergeConfig, MergeStats, Merged,
    Merger,
};
