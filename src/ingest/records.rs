//! Raw record shapes as the pipelines write them.
//!
//! The joint-IE pipeline writes graph components as positional arrays
//! (`[start, end, type, ..., score]`); trailing fields vary between model
//! versions and are ignored.

use crate::error::{Error, Result};
use serde::Deserialize;
use serde_json::Value;
use tempo_core::{EventKey, Mention, MentionArgument, Relation, SourceDocument, SourceEvent};

/// One sentence segment from the joint-IE pipeline.
#[derive(Debug, Clone, Deserialize)]
pub struct JointIeSegment {
    /// Document the segment belongs to
    pub doc_id: String,
    /// Segment tokens
    pub tokens: Vec<String>,
    /// Offset id of each token (`<doc>:<start>-<end>`)
    pub token_ids: Vec<String>,
    /// Extracted graph
    pub graph: JointIeGraph,
}

/// Entities, triggers, and roles of one segment.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JointIeGraph {
    /// Entity mentions
    #[serde(default)]
    pub entities: Vec<EntityRecord>,
    /// Event triggers
    #[serde(default)]
    pub triggers: Vec<TriggerRecord>,
    /// Trigger-entity argument links
    #[serde(default)]
    pub roles: Vec<RoleRecord>,
}

/// `[start, end, type, ...]`, token indices with exclusive end.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Vec<Value>")]
pub struct TriggerRecord {
    /// First token
    pub start: usize,
    /// One past the last token
    pub end: usize,
    /// Event type
    pub event_type: String,
}

impl TryFrom<Vec<Value>> for TriggerRecord {
    type Error = Error;

    fn try_from(fields: Vec<Value>) -> Result<Self> {
        Ok(Self {
            start: index_field(&fields, 0, "trigger")?,
            end: index_field(&fields, 1, "trigger")?,
            event_type: string_field(&fields, 2, "trigger")?,
        })
    }
}

/// `[start, end, type?, ...]`, token indices with exclusive end.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Vec<Value>")]
pub struct EntityRecord {
    /// First token
    pub start: usize,
    /// One past the last token
    pub end: usize,
    /// Entity type, when present
    pub entity_type: Option<String>,
}

impl TryFrom<Vec<Value>> for EntityRecord {
    type Error = Error;

    fn try_from(fields: Vec<Value>) -> Result<Self> {
        Ok(Self {
            start: index_field(&fields, 0, "entity")?,
            end: index_field(&fields, 1, "entity")?,
            entity_type: fields.get(2).and_then(Value::as_str).map(str::to_string),
        })
    }
}

/// `[trigger_index, entity_index, role, ...]`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Vec<Value>")]
pub struct RoleRecord {
    /// Index into the segment's triggers
    pub event_idx: usize,
    /// Index into the segment's entities
    pub entity_idx: usize,
    /// Argument role
    pub role: String,
}

impl TryFrom<Vec<Value>> for RoleRecord {
    type Error = Error;

    fn try_from(fields: Vec<Value>) -> Result<Self> {
        Ok(Self {
            event_idx: index_field(&fields, 0, "role")?,
            entity_idx: index_field(&fields, 1, "role")?,
            role: string_field(&fields, 2, "role")?,
        })
    }
}

fn index_field(fields: &[Value], pos: usize, record: &str) -> Result<usize> {
    fields
        .get(pos)
        .and_then(Value::as_u64)
        .and_then(|n| usize::try_from(n).ok())
        .ok_or_else(|| {
            Error::parse(format!(
                "{} record field {} is not a token index: {:?}",
                record,
                pos,
                fields.get(pos)
            ))
        })
}

fn string_field(fields: &[Value], pos: usize, record: &str) -> Result<String> {
    fields
        .get(pos)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| {
            Error::parse(format!(
                "{} record field {} is not a string: {:?}",
                record,
                pos,
                fields.get(pos)
            ))
        })
}

/// One document from a temporal tagger.
#[derive(Debug, Clone, Deserialize)]
pub struct TemporalDocumentRecord {
    /// Document id
    pub doc_id: String,
    /// Discovered events
    #[serde(default)]
    pub events: Vec<TemporalEventRecord>,
    /// Scored event-event relations
    #[serde(default)]
    pub relations: Vec<Relation>,
    /// Mentions referenced by event arguments
    #[serde(default)]
    pub mentions: Vec<Mention>,
}

/// One event from a temporal tagger.
#[derive(Debug, Clone, Deserialize)]
pub struct TemporalEventRecord {
    /// Canonical key, as given
    pub event_id: EventKey,
    /// Trigger text
    pub text: String,
    /// Mention-referencing arguments
    #[serde(default)]
    pub arguments: Vec<MentionArgument>,
}

impl From<TemporalEventRecord> for SourceEvent {
    fn from(record: TemporalEventRecord) -> Self {
        SourceEvent::Temporal {
            event_id: record.event_id,
            text: record.text,
            arguments: record.arguments,
        }
    }
}

impl From<TemporalDocumentRecord> for SourceDocument {
    fn from(record: TemporalDocumentRecord) -> Self {
        SourceDocument {
            events: record.events.into_iter().map(SourceEvent::from).collect(),
            relations: record.relations,
            mentions: record.mentions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_segment_with_trailing_fields() {
        let segment: JointIeSegment = serde_json::from_value(json!({
            "doc_id": "d1",
            "sent_id": "d1-0",
            "tokens": ["Rebels", "attacked", "the", "town"],
            "token_ids": ["d1:0-5", "d1:7-14", "d1:16-18", "d1:20-23"],
            "graph": {
                "entities": [[0, 1, "PER", "NAM", 1.0], [2, 4, "GPE", "NOM", 0.8]],
                "triggers": [[1, 2, "Conflict:Attack", 0.97]],
                "relations": [],
                "roles": [[0, 0, "Attacker", 0.9], [0, 1, "Place", 0.7]]
            }
        }))
        .unwrap();

        assert_eq!(segment.graph.triggers[0].event_type, "Conflict:Attack");
        assert_eq!(segment.graph.entities[1].end, 4);
        assert_eq!(segment.graph.roles[1].role, "Place");
    }

    #[test]
    fn test_short_trigger_record_is_rejected() {
        let result: std::result::Result<TriggerRecord, _> = serde_json::from_value(json!([1, 2]));
        assert!(result.is_err());
    }

    #[test]
    fn test_temporal_document_keeps_relation_metadata() {
        let record: TemporalDocumentRecord = serde_json::from_value(json!({
            "doc_id": "d1",
            "tokens": ["ignored"],
            "events": [{"event_id": "[1:2)", "text": "attacked", "arguments": [{"mention_id": "m0", "role": "ARG0"}]}],
            "relations": [{"event1_id": "[1:2)", "event2_id": "[5:6)", "confidence": 0.8, "relation": "BEFORE"}],
            "mentions": [{"mention_id": "m0", "text": "Rebels", "span": [0, 1]}]
        }))
        .unwrap();

        let document = SourceDocument::from(record);
        assert_eq!(document.events[0].key().as_str(), "[1:2)");
        assert_eq!(document.relations[0].label(), Some("BEFORE"));
        assert_eq!(document.mention_text("m0"), Some("Rebels"));
    }
}
