//! # tempo
//!
//! Reconcile event extractions from several NLP pipelines into one
//! provenance-tagged supergraph, then report how the pipelines agree.
//!
//! - **Ingest**: read each pipeline's JSON or JSON Lines output
//! - **Normalize**: turn joint-IE trigger graphs into span-keyed events
//! - **Merge**: collapse events onto canonical `[start:end)` keys and attach
//!   temporal relations (see [`tempo_coalesce`])
//! - **Report**: per-document coverage, overlap, and confidence statistics as
//!   text, CSV, and SVG
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tempo::{pipeline, PipelineConfig};
//!
//! let config = PipelineConfig::load("tempo.toml")?;
//! let merged = pipeline::build_and_write(&config, false)?;
//! pipeline::analyze(&config, &merged.supergraph, pipeline::today())?;
//! # Ok::<(), tempo::Error>(())
//! ```
//!
//! ## Sources
//!
//! | Source | Kind | Event identity |
//! |--------|------|----------------|
//! | `oneie` | joint-ie | offset id of the trigger's first token |
//! | `tear-tbd` | temporal | `event_id` as given |
//! | `tear-matres` | temporal | `event_id` as given |

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod ingest;
pub mod normalize;
pub mod pipeline;
pub mod report;

#[cfg(feature = "cli")]
pub mod cli;

pub use config::{OnDangling, PipelineConfig, SourceConfig};
pub use error::{Error, Result};
pub use tempo_coalesce::{DanglingRelation, MergeConfig, MergeStats, Merged, Merger};
pub use tempo_core::{
    Argument, DocumentGraph, Event, EventKey, Provenance, Relation, SourceCorpus, SourceKind, Span,
    Supergraph,
};
