//! Source ingestion.
//!
//! Reads each pipeline's output directory, accepting both single-JSON and
//! JSON Lines files, and turns it into a [`tempo_core::SourceCorpus`].

pub mod loader;
pub mod records;

pub use loader::{parse_json_or_jsonl, read_source, source_files};
pub use records::{JointIeSegment, TemporalDocumentRecord};
