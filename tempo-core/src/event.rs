//! Merged events, relations, and provenance.
//!
//! An [`Event`] is the single record a document keeps for one [`EventKey`],
//! however many sources discovered it. Anything a source contributes is kept
//! under that source's name, so two pipelines never overwrite each other's
//! arguments or relations.
//!
//! # Wire format
//!
//! Events serialize to a flat object whose per-source keys are qualified by
//! the source name:
//!
//! ```json
//! {
//!   "text": "attacked",
//!   "type": "Conflict:Attack",
//!   "oneie_args": [{"role": "Attacker", "token": "rebels"}],
//!   "tear-tbd_args": [],
//!   "source": ["oneie", "tear-tbd"],
//!   "tear-tbd_relations": [{"event1_id": "[0:1)", "event2_id": "[2:3)", "confidence": 0.9}]
//! }
//! ```

use crate::error::Error;
use crate::span::EventKey;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::{BTreeMap, BTreeSet};

const ARGS_SUFFIX: &str = "_args";
const RELATIONS_SUFFIX: &str = "_relations";

/// A role-labeled argument attached to an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Argument {
    /// Argument role (e.g. "Attacker", "Place")
    pub role: String,
    /// Surface text of the argument span
    pub token: String,
}

impl Argument {
    /// Create a new argument.
    #[must_use]
    pub fn new(role: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            token: token.into(),
        }
    }
}

/// A directed, confidence-scored temporal link between two events.
///
/// Fields beyond the two endpoints and the confidence (relation label,
/// model-specific scores) are preserved verbatim in `metadata`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relation {
    /// Source event key
    pub event1_id: EventKey,
    /// Target event key
    pub event2_id: EventKey,
    /// Confidence score (0.0 - 1.0)
    pub confidence: f64,
    /// Remaining source fields
    #[serde(flatten)]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl Relation {
    /// Create a relation without metadata.
    #[must_use]
    pub fn new(
        event1_id: impl Into<EventKey>,
        event2_id: impl Into<EventKey>,
        confidence: f64,
    ) -> Self {
        Self {
            event1_id: event1_id.into(),
            event2_id: event2_id.into(),
            confidence,
            metadata: BTreeMap::new(),
        }
    }

    /// Attach a metadata field.
    #[must_use]
    pub fn with_metadata(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// The relation label, if the source provided one.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.metadata
            .get("relation")
            .or_else(|| self.metadata.get("relation_type"))
            .and_then(|v| v.as_str())
    }
}

/// Which sources discovered an event, in discovery order.
///
/// This is a multiset: a source that reports the same key twice appears
/// twice. Use [`Provenance::sources`] when counting distinct contributors and
/// [`Provenance::discoveries`] when the repetition matters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Provenance(Vec<String>);

impl Provenance {
    /// Create an empty provenance record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one discovery by `source`.
    pub fn record(&mut self, source: impl Into<String>) {
        self.0.push(source.into());
    }

    /// Check whether `source` discovered the event at least once.
    #[must_use]
    pub fn contains(&self, source: &str) -> bool {
        self.0.iter().any(|s| s == source)
    }

    /// Distinct contributing sources.
    #[must_use]
    pub fn sources(&self) -> BTreeSet<&str> {
        self.0.iter().map(String::as_str).collect()
    }

    /// How many times `source` discovered the event.
    #[must_use]
    pub fn discoveries(&self, source: &str) -> usize {
        self.0.iter().filter(|s| *s == source).count()
    }

    /// All discoveries in order, duplicates included.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Total number of discoveries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if no source has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for Provenance {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// One event of a document graph, merged across sources.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "serde_json::Map<String, serde_json::Value>")]
pub struct Event {
    /// Surface text of the trigger
    pub text: String,
    /// Event category (only the joint-IE source provides one)
    pub event_type: Option<String>,
    /// Arguments keyed by contributing source
    pub arguments: BTreeMap<String, Vec<Argument>>,
    /// Contributing sources
    pub provenance: Provenance,
    /// Outgoing relations keyed by reporting source
    pub relations: BTreeMap<String, Vec<Relation>>,
}

impl Event {
    /// Create an event with only its trigger text.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Check whether `source` discovered this event.
    #[must_use]
    pub fn has_source(&self, source: &str) -> bool {
        self.provenance.contains(source)
    }

    /// Arguments contributed by `source`.
    #[must_use]
    pub fn arguments_from(&self, source: &str) -> &[Argument] {
        self.arguments.get(source).map(Vec::as_slice).unwrap_or_default()
    }

    /// Relations reported by `source`.
    #[must_use]
    pub fn relations_from(&self, source: &str) -> &[Relation] {
        self.relations.get(source).map(Vec::as_slice).unwrap_or_default()
    }

    /// Attach a relation under `source`.
    pub fn push_relation(&mut self, source: impl Into<String>, relation: Relation) {
        self.relations.entry(source.into()).or_default().push(relation);
    }

    /// Every stored relation, across all sources.
    pub fn all_relations(&self) -> impl Iterator<Item = &Relation> {
        self.relations.values().flatten()
    }

    /// Relations with content-identical duplicates removed.
    ///
    /// The same relation reported by two sources is stored twice (once per
    /// source); statistics should count it once.
    #[must_use]
    pub fn unique_relations(&self) -> Vec<&Relation> {
        let mut unique: Vec<&Relation> = Vec::new();
        for relation in self.all_relations() {
            if !unique.contains(&relation) {
                unique.push(relation);
            }
        }
        unique
    }
}

impl Serialize for Event {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("text", &self.text)?;
        if let Some(event_type) = &self.event_type {
            map.serialize_entry("type", event_type)?;
        }
        for (source, args) in &self.arguments {
            map.serialize_entry(&format!("{}{}", source, ARGS_SUFFIX), args)?;
        }
        map.serialize_entry("source", &self.provenance)?;
        for (source, relations) in &self.relations {
            map.serialize_entry(&format!("{}{}", source, RELATIONS_SUFFIX), relations)?;
        }
        map.end()
    }
}

impl TryFrom<serde_json::Map<String, serde_json::Value>> for Event {
    type Error = Error;

    fn try_from(fields: serde_json::Map<String, serde_json::Value>) -> Result<Self, Error> {
        let mut event = Event::default();
        let mut saw_text = false;

        for (key, value) in fields {
            match key.as_str() {
                "text" => {
                    event.text = serde_json::from_value(value)?;
                    saw_text = true;
                }
                "type" => event.event_type = serde_json::from_value(value)?,
                "source" => event.provenance = serde_json::from_value(value)?,
                _ => {
                    if let Some(source) = key.strip_suffix(RELATIONS_SUFFIX) {
                        event
                            .relations
                            .insert(source.to_string(), serde_json::from_value(value)?);
                    } else if let Some(source) = key.strip_suffix(ARGS_SUFFIX) {
                        event
                            .arguments
                            .insert(source.to_string(), serde_json::from_value(value)?);
                    } else {
                        return Err(Error::parse(format!("unexpected event field '{}'", key)));
                    }
                }
            }
        }

        if !saw_text {
            return Err(Error::parse("event is missing 'text'"));
        }
        Ok(event)
    }
}
