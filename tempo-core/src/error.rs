//! Error types for tempo-core.

use thiserror::Error;

/// Result type for tempo operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for tempo operations.
///
/// Every variant is fatal to the step that raised it: a malformed corpus
/// stops the run rather than producing partial statistics.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// A source file or record could not be parsed.
    #[error("Parse error: {0}")]
    Parse(String),

    /// A span identifier could not be turned into an event key.
    #[error("Invalid span '{input}': {reason}")]
    InvalidSpan {
        /// The offending input
        input: String,
        /// Why it was rejected
        reason: String,
    },

    /// A relation names a source event that no source discovered.
    #[error("Unknown event {event_id} in document '{doc_id}' (relation from '{source_name}')")]
    UnknownEvent {
        /// Document containing the relation
        doc_id: String,
        /// The missing `event1_id`
        event_id: String,
        /// Source that reported the relation
        source_name: String,
    },

    /// An argument names a mention missing from its document's mention list.
    #[error("Unknown mention '{mention_id}' in document '{doc_id}' (source '{source_name}')")]
    UnknownMention {
        /// Document containing the argument
        doc_id: String,
        /// The missing mention id
        mention_id: String,
        /// Source that reported the argument
        source_name: String,
    },

    /// A ratio was requested over an empty population.
    #[error("Degenerate aggregate: {0}")]
    DegenerateAggregate(String),

    /// Invalid input provided.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Invalid configuration.
    #[error("Config error: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a parse error.
    #[must_use]
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create an invalid span error.
    #[must_use]
    pub fn invalid_span(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidSpan {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Create a degenerate aggregate error.
    #[must_use]
    pub fn degenerate(msg: impl Into<String>) -> Self {
        Self::DegenerateAggregate(msg.into())
    }

    /// Create an invalid input error.
    #[must_use]
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a config error.
    #[must_use]
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
