//! Error types for tempo.
//!
//! The workspace shares one error enum, defined in `tempo-core`.

pub use tempo_core::error::{Error, Result};
