//! Per-source records, after loading and normalization but before merging.
//!
//! Each pipeline contributes a [`SourceCorpus`]. The joint-IE pipeline's
//! events already carry resolved argument text and an event type; the
//! temporal taggers' events point at mentions that are resolved against the
//! document's own mention list during the merge.

use crate::event::{Argument, Relation};
use crate::span::EventKey;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// The record convention a source follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceKind {
    /// Segment/trigger/role graphs from a joint information-extraction model
    JointIe,
    /// Named events, mentions, and scored event-event relations
    Temporal,
}

impl SourceKind {
    /// Kebab-case label, as used in configuration files.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::JointIe => "joint-ie",
            Self::Temporal => "temporal",
        }
    }

    /// Whether sources of this kind report relations.
    #[must_use]
    pub const fn has_relations(&self) -> bool {
        matches!(self, Self::Temporal)
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A textual mention in a temporal source's document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mention {
    /// Mention id, unique within its document
    pub mention_id: String,
    /// Surface text
    pub text: String,
    /// Remaining source fields
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Mention {
    /// Create a mention.
    #[must_use]
    pub fn new(mention_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            mention_id: mention_id.into(),
            text: text.into(),
            extra: BTreeMap::new(),
        }
    }
}

/// An event argument that refers to a mention by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MentionArgument {
    /// Referenced mention id
    pub mention_id: String,
    /// Argument role
    pub role: String,
}

impl MentionArgument {
    /// Create a mention-referencing argument.
    #[must_use]
    pub fn new(mention_id: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            mention_id: mention_id.into(),
            role: role.into(),
        }
    }
}

/// One event as reported by a single source.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceEvent {
    /// Reconstructed from a joint-IE trigger and its roles.
    JointIe {
        /// Canonical span key
        event_id: EventKey,
        /// Trigger text
        text: String,
        /// Trigger type
        event_type: String,
        /// Arguments with resolved surface text
        arguments: Vec<Argument>,
    },
    /// Reported by a temporal tagger.
    Temporal {
        /// Event key as given by the source
        event_id: EventKey,
        /// Trigger text
        text: String,
        /// Arguments referring to the document's mentions
        arguments: Vec<MentionArgument>,
    },
}

impl SourceEvent {
    /// The event key.
    #[must_use]
    pub fn key(&self) -> &EventKey {
        match self {
            Self::JointIe { event_id, .. } | Self::Temporal { event_id, .. } => event_id,
        }
    }

    /// The trigger text.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::JointIe { text, .. } | Self::Temporal { text, .. } => text,
        }
    }

    /// The record convention this event follows.
    #[must_use]
    pub const fn kind(&self) -> SourceKind {
        match self {
            Self::JointIe { .. } => SourceKind::JointIe,
            Self::Temporal { .. } => SourceKind::Temporal,
        }
    }
}

/// Everything one source reported about one document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceDocument {
    /// Discovered events
    pub events: Vec<SourceEvent>,
    /// Event-event relations (temporal sources only)
    pub relations: Vec<Relation>,
    /// Mentions referenced by event arguments (temporal sources only)
    pub mentions: Vec<Mention>,
}

impl SourceDocument {
    /// Create a document holding only events.
    #[must_use]
    pub fn with_events(events: Vec<SourceEvent>) -> Self {
        Self {
            events,
            ..Self::default()
        }
    }

    /// Surface text of a mention, looked up by id.
    #[must_use]
    pub fn mention_text(&self, mention_id: &str) -> Option<&str> {
        self.mentions
            .iter()
            .find(|m| m.mention_id == mention_id)
            .map(|m| m.text.as_str())
    }
}

/// One source's documents, keyed by document id.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceCorpus {
    /// Source name, used to qualify attribute keys in the supergraph
    pub name: String,
    /// Record convention
    pub kind: SourceKind,
    /// Documents in id order
    pub documents: BTreeMap<String, SourceDocument>,
}

impl SourceCorpus {
    /// Create an empty corpus.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: SourceKind) -> Self {
        Self {
            name: name.into(),
            kind,
            documents: BTreeMap::new(),
        }
    }

    /// Add a document, returning any document it replaced.
    pub fn insert(
        &mut self,
        doc_id: impl Into<String>,
        document: SourceDocument,
    ) -> Option<SourceDocument> {
        self.documents.insert(doc_id.into(), document)
    }

    /// Builder-style [`SourceCorpus::insert`].
    #[must_use]
    pub fn with_document(mut self, doc_id: impl Into<String>, document: SourceDocument) -> Self {
        self.insert(doc_id, document);
        self
    }

    /// Number of documents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Check if the corpus has no documents.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Total events across documents.
    #[must_use]
    pub fn event_count(&self) -> usize {
        self.documents.values().map(|d| d.events.len()).sum()
    }

    /// Total relations across documents.
    #[must_use]
    pub fn relation_count(&self) -> usize {
        self.documents.values().map(|d| d.relations.len()).sum()
    }
}
