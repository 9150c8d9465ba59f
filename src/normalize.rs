//! Convert joint-IE segments into keyed source events.
//!
//! A segment's triggers become events; its roles attach entity text to those
//! events as arguments. The event key comes from the offset id of the
//! trigger's first token, so it lines up with the keys the temporal taggers
//! hand out.

use crate::error::{Error, Result};
use crate::ingest::records::JointIeSegment;
use tempo_core::{Argument, SourceDocument, SourceEvent, Span};

/// Normalize every segment of one document, in order.
pub fn normalize_document(doc_id: &str, segments: &[JointIeSegment]) -> Result<SourceDocument> {
    let mut events = Vec::new();
    for segment in segments {
        events.extend(normalize_segment(doc_id, segment)?);
    }
    log::debug!(
        "normalized {} segments of '{}' into {} events",
        segments.len(),
        doc_id,
        events.len()
    );
    Ok(SourceDocument::with_events(events))
}

/// Normalize one segment.
///
/// Events come out in trigger order. Out-of-range indices are errors.
pub fn normalize_segment(doc_id: &str, segment: &JointIeSegment) -> Result<Vec<SourceEvent>> {
    let tokens = &segment.tokens;
    let graph = &segment.graph;

    // 1. One event per trigger, keyed by its first token
    let mut events = Vec::with_capacity(graph.triggers.len());
    for trigger in &graph.triggers {
        let (Some(offset_id), Some(text)) = (
            segment.token_ids.get(trigger.start),
            tokens.get(trigger.start),
        ) else {
            return Err(Error::invalid_input(format!(
                "trigger token {} out of range in document '{}' ({} tokens)",
                trigger.start,
                doc_id,
                tokens.len().min(segment.token_ids.len())
            )));
        };
        if trigger.end > trigger.start + 1 {
            log::warn!(
                "multi-token trigger [{}, {}) in '{}'; keeping first token '{}'",
                trigger.start,
                trigger.end,
                doc_id,
                text
            );
        }
        events.push(SourceEvent::JointIe {
            event_id: Span::from_offset_id(offset_id)?.key(),
            text: text.clone(),
            event_type: trigger.event_type.clone(),
            arguments: Vec::new(),
        });
    }

    // 2. Attach role arguments
    for role in &graph.roles {
        let entity = graph.entities.get(role.entity_idx).ok_or_else(|| {
            Error::invalid_input(format!(
                "role references entity {} but document '{}' segment has {}",
                role.entity_idx,
                doc_id,
                graph.entities.len()
            ))
        })?;
        let surface = tokens
            .get(entity.start..entity.end)
            .ok_or_else(|| {
                Error::invalid_input(format!(
                    "entity tokens [{}, {}) out of range in document '{}' ({} tokens)",
                    entity.start,
                    entity.end,
                    doc_id,
                    tokens.len()
                ))
            })?
            .join(" ");
        let Some(SourceEvent::JointIe { arguments, .. }) = events.get_mut(role.event_idx) else {
            return Err(Error::invalid_input(format!(
                "role references trigger {} but document '{}' segment has {}",
                role.event_idx,
                doc_id,
                graph.triggers.len()
            )));
        };
        arguments.push(Argument::new(&role.role, surface));
    }

    Ok(events)
}
