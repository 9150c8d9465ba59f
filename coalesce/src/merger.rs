//! Event identity resolution and relation merging.

use tempo_core::{
    Argument, Error, Event, EventKey, Result, SourceCorpus, SourceDocument, SourceEvent, Supergraph,
};

/// What to do with a relation whose `event1_id` no source discovered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DanglingRelation {
    /// Fail the merge with [`Error::UnknownEvent`].
    #[default]
    Abort,
    /// Drop the relation, log a warning, and count it in [`MergeStats`].
    Skip,
}

/// Merger settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeConfig {
    /// Policy for relations anchored on unknown events
    pub on_dangling: DanglingRelation,
}

/// Counters collected while merging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    /// Documents in the supergraph
    pub documents: usize,
    /// Events inserted under a key not seen before
    pub events_created: usize,
    /// Events folded into an existing key
    pub events_merged: usize,
    /// Relations stored
    pub relations_attached: usize,
    /// Relations dropped under [`DanglingRelation::Skip`]
    pub relations_skipped: usize,
}

/// What one source says about one event, with mentions already resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct EventContribution {
    /// Trigger text
    pub text: String,
    /// Event type, if the source assigns one
    pub event_type: Option<String>,
    /// Arguments with surface text
    pub arguments: Vec<Argument>,
}

impl EventContribution {
    /// Resolve a source event against its document.
    ///
    /// Temporal arguments name mentions; each is replaced by the mention's
    /// text. A mention missing from the document is an error.
    pub fn resolve(
        event: &SourceEvent,
        document: &SourceDocument,
        doc_id: &str,
        source: &str,
    ) -> Result<Self> {
        match event {
            SourceEvent::JointIe {
                text,
                event_type,
                arguments,
                ..
            } => Ok(Self {
                text: text.clone(),
                event_type: Some(event_type.clone()),
                arguments: arguments.clone(),
            }),
            SourceEvent::Temporal {
                text, arguments, ..
            } => {
                let arguments = arguments
                    .iter()
                    .map(|arg| {
                        document
                            .mention_text(&arg.mention_id)
                            .map(|token| Argument::new(&arg.role, token))
                            .ok_or_else(|| Error::UnknownMention {
                                doc_id: doc_id.to_string(),
                                mention_id: arg.mention_id.clone(),
                                source_name: source.to_string(),
                            })
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok(Self {
                    text: text.clone(),
                    event_type: None,
                    arguments,
                })
            }
        }
    }
}

/// Fold one source's contribution into the event stored under its key.
///
/// The rule, per attribute:
/// - `text`: the latest contribution replaces the stored text;
/// - `type`: set when the contribution carries one, otherwise kept;
/// - arguments: stored under `source`, replacing what that same source
///   contributed before;
/// - provenance: `source` is appended, so repeated discovery is counted.
///
/// ```
/// use tempo_coalesce::{merge_event, EventContribution};
///
/// let joint = EventContribution {
///     text: "attack".into(),
///     event_type: Some("Conflict:Attack".into()),
///     arguments: vec![],
/// };
/// let temporal = EventContribution {
///     text: "attacked".into(),
///     event_type: None,
///     arguments: vec![],
/// };
///
/// let event = merge_event(None, "oneie", joint);
/// let event = merge_event(Some(event), "tear-tbd", temporal);
///
/// assert_eq!(event.text, "attacked");
/// assert_eq!(event.event_type.as_deref(), Some("Conflict:Attack"));
/// assert_eq!(event.provenance.iter().collect::<Vec<_>>(), ["oneie", "tear-tbd"]);
/// ```
#[must_use]
pub fn merge_event(existing: Option<Event>, source: &str, contribution: EventContribution) -> Event {
    let mut event = existing.unwrap_or_default();
    event.text = contribution.text;
    if contribution.event_type.is_some() {
        event.event_type = contribution.event_type;
    }
    event
        .arguments
        .insert(source.to_string(), contribution.arguments);
    event.provenance.record(source);
    event
}

/// A supergraph holding every source's events and no relations yet.
///
/// Only [`Merger::merge_events`] produces one, and [`Merger::merge_relations`]
/// requires one, so relation lookups always run against the complete event
/// set.
#[derive(Debug, Clone)]
pub struct EventGraph {
    graph: Supergraph,
    stats: MergeStats,
}

impl EventGraph {
    /// The events merged so far.
    #[must_use]
    pub fn graph(&self) -> &Supergraph {
        &self.graph
    }

    /// Counters from the event phase.
    #[must_use]
    pub fn stats(&self) -> MergeStats {
        self.stats
    }
}

/// The finished merge.
#[derive(Debug, Clone)]
pub struct Merged {
    /// The supergraph
    pub supergraph: Supergraph,
    /// Counters from both phases
    pub stats: MergeStats,
}

/// Folds source corpora into one supergraph.
#[derive(Debug, Clone, Default)]
pub struct Merger {
    config: MergeConfig,
}

impl Merger {
    /// Create a merger with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a merger with explicit settings.
    #[must_use]
    pub fn with_config(config: MergeConfig) -> Self {
        Self { config }
    }

    /// Set the dangling-relation policy.
    #[must_use]
    pub fn on_dangling(mut self, policy: DanglingRelation) -> Self {
        self.config.on_dangling = policy;
        self
    }

    /// Run both phases.
    pub fn merge(&self, corpora: &[SourceCorpus]) -> Result<Merged> {
        let events = self.merge_events(corpora)?;
        self.merge_relations(events, corpora)
    }

    /// Phase one: fold every source's events into the supergraph.
    ///
    /// Joint-IE sources go first, then the remaining sources in the order
    /// given. Every document any source mentions gets a graph entry, even if
    /// it contributes no events.
    pub fn merge_events(&self, corpora: &[SourceCorpus]) -> Result<EventGraph> {
        let mut graph = Supergraph::new();
        let mut stats = MergeStats::default();

        for corpus in merge_order(corpora) {
            log::debug!(
                "merging events from '{}' ({} documents, {} events)",
                corpus.name,
                corpus.len(),
                corpus.event_count()
            );

            for (doc_id, document) in &corpus.documents {
                // 1. Ensure the document exists
                let doc_graph = graph.document_or_default(doc_id);

                // 2. Fold each event into its key
                for source_event in &document.events {
                    let contribution =
                        EventContribution::resolve(source_event, document, doc_id, &corpus.name)?;
                    let key: EventKey = source_event.key().clone();
                    let existing = doc_graph.remove(key.as_str());
                    if existing.is_some() {
                        stats.events_merged += 1;
                    } else {
                        stats.events_created += 1;
                    }
                    doc_graph.insert(key, merge_event(existing, &corpus.name, contribution));
                }
            }
        }

        stats.documents = graph.len();
        log::info!(
            "merged {} events ({} new keys, {} re-discoveries) across {} documents",
            stats.events_created + stats.events_merged,
            stats.events_created,
            stats.events_merged,
            stats.documents
        );

        Ok(EventGraph { graph, stats })
    }

    /// Phase two: attach every relation to its `event1_id`.
    ///
    /// Relations are stored under the reporting source and never
    /// deduplicated, so two sources reporting the same pair both keep their
    /// copy.
    pub fn merge_relations(&self, events: EventGraph, corpora: &[SourceCorpus]) -> Result<Merged> {
        let EventGraph {
            mut graph,
            mut stats,
        } = events;

        for corpus in merge_order(corpora) {
            if !corpus.kind.has_relations() {
                continue;
            }
            log::debug!(
                "merging relations from '{}' ({} relations)",
                corpus.name,
                corpus.relation_count()
            );

            for (doc_id, document) in &corpus.documents {
                let doc_graph = graph.document_or_default(doc_id);

                for relation in &document.relations {
                    if !doc_graph.contains(relation.event2_id.as_str()) {
                        log::debug!(
                            "relation target {} not discovered in '{}' ({})",
                            relation.event2_id,
                            doc_id,
                            corpus.name
                        );
                    }

                    match doc_graph.get_mut(relation.event1_id.as_str()) {
                        Some(event) => {
                            event.push_relation(&corpus.name, relation.clone());
                            stats.relations_attached += 1;
                        }
                        None => match self.config.on_dangling {
                            DanglingRelation::Abort => {
                                return Err(Error::UnknownEvent {
                                    doc_id: doc_id.clone(),
                                    event_id: relation.event1_id.to_string(),
                                    source_name: corpus.name.clone(),
                                });
                            }
                            DanglingRelation::Skip => {
                                log::warn!(
                                    "skipping relation {} -> {} in '{}' from '{}': unknown source event",
                                    relation.event1_id,
                                    relation.event2_id,
                                    doc_id,
                                    corpus.name
                                );
                                stats.relations_skipped += 1;
                            }
                        },
                    }
                }
            }
        }

        stats.documents = graph.len();
        log::info!(
            "attached {} relations ({} skipped)",
            stats.relations_attached,
            stats.relations_skipped
        );

        Ok(Merged {
            supergraph: graph,
            stats,
        })
    }
}

/// Joint-IE sources first, the rest in their given order.
fn merge_order(corpora: &[SourceCorpus]) -> Vec<&SourceCorpus> {
    let mut ordered: Vec<&SourceCorpus> = corpora.iter().collect();
    ordered.sort_by_key(|c| c.kind.has_relations());
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempo_core::{Mention, MentionArgument, Relation, SourceKind, Span};

    fn joint_event(span: Span, text: &str, event_type: &str) -> SourceEvent {
        SourceEvent::JointIe {
            event_id: span.key(),
            text: text.into(),
            event_type: event_type.into(),
            arguments: vec![Argument::new("Attacker", "rebels")],
        }
    }

    fn temporal_event(key: &str, text: &str, mention_ids: &[&str]) -> SourceEvent {
        SourceEvent::Temporal {
            event_id: key.into(),
            text: text.into(),
            arguments: mention_ids
                .iter()
                .map(|id| MentionArgument::new(*id, "ARG0"))
                .collect(),
        }
    }

    fn temporal_corpus(name: &str, doc: SourceDocument) -> SourceCorpus {
        SourceCorpus::new(name, SourceKind::Temporal).with_document("d1", doc)
    }

    #[test]
    fn test_same_key_from_three_sources_merges_once() {
        let oneie = SourceCorpus::new("oneie", SourceKind::JointIe).with_document(
            "d1",
            SourceDocument::with_events(vec![joint_event(Span::new(0, 1), "attack", "Attack")]),
        );
        let tbd = temporal_corpus(
            "tear-tbd",
            SourceDocument::with_events(vec![temporal_event("[0:1)", "attacked", &[])]),
        );
        let matres = temporal_corpus(
            "tear-matres",
            SourceDocument::with_events(vec![temporal_event("[0:1)", "attacked", &[])]),
        );

        let merged = Merger::new().merge(&[tbd, matres, oneie]).unwrap();
        let doc = merged.supergraph.document("d1").unwrap();
        assert_eq!(doc.len(), 1);

        let event = doc.get("[0:1)").unwrap();
        assert_eq!(
            event.provenance.iter().collect::<Vec<_>>(),
            ["oneie", "tear-tbd", "tear-matres"]
        );
        assert_eq!(event.event_type.as_deref(), Some("Attack"));
        assert_eq!(merged.stats.events_created, 1);
        assert_eq!(merged.stats.events_merged, 2);
    }

    #[test]
    fn test_rediscovery_within_one_source_inflates_provenance() {
        let tbd = temporal_corpus(
            "tear-tbd",
            SourceDocument::with_events(vec![
                temporal_event("[3:4)", "said", &[]),
                temporal_event("[3:4)", "said", &[]),
            ]),
        );
        let merged = Merger::new().merge(&[tbd]).unwrap();
        let event = merged.supergraph.document("d1").unwrap().get("[3:4)").unwrap();
        assert_eq!(event.provenance.len(), 2);
        assert_eq!(event.provenance.sources().len(), 1);
    }

    #[test]
    fn test_mentions_resolve_to_tokens() {
        let doc = SourceDocument {
            events: vec![temporal_event("[0:1)", "fled", &["m1"])],
            relations: vec![],
            mentions: vec![Mention::new("m1", "the villagers")],
        };
        let merged = Merger::new().merge(&[temporal_corpus("tear-tbd", doc)]).unwrap();
        let event = merged.supergraph.document("d1").unwrap().get("[0:1)").unwrap();
        assert_eq!(
            event.arguments_from("tear-tbd"),
            [Argument::new("ARG0", "the villagers")]
        );
    }

    #[test]
    fn test_unknown_mention_is_an_error() {
        let doc = SourceDocument::with_events(vec![temporal_event("[0:1)", "fled", &["m9"])]);
        let err = Merger::new()
            .merge(&[temporal_corpus("tear-tbd", doc)])
            .unwrap_err();
        assert!(matches!(err, Error::UnknownMention { ref mention_id, .. } if mention_id == "m9"));
    }

    #[test]
    fn test_relations_from_two_sources_are_both_kept() {
        let relation = Relation::new("[0:1)", "[2:3)", 0.9);
        let make = || SourceDocument {
            events: vec![
                temporal_event("[0:1)", "a", &[]),
                temporal_event("[2:3)", "b", &[]),
            ],
            relations: vec![relation.clone()],
            mentions: vec![],
        };
        let merged = Merger::new()
            .merge(&[temporal_corpus("tear-tbd", make()), temporal_corpus("tear-matres", make())])
            .unwrap();
        let event = merged.supergraph.document("d1").unwrap().get("[0:1)").unwrap();
        assert_eq!(event.relations_from("tear-tbd"), [relation.clone()]);
        assert_eq!(event.relations_from("tear-matres"), [relation]);
        assert_eq!(merged.stats.relations_attached, 2);
    }

    #[test]
    fn test_relation_may_anchor_on_event_from_another_source() {
        let oneie = SourceCorpus::new("oneie", SourceKind::JointIe).with_document(
            "d1",
            SourceDocument::with_events(vec![joint_event(Span::new(4, 5), "bombing", "Attack")]),
        );
        let tbd = temporal_corpus(
            "tear-tbd",
            SourceDocument {
                events: vec![],
                relations: vec![Relation::new("[4:5)", "[7:8)", 0.4)],
                mentions: vec![],
            },
        );
        let merged = Merger::new().merge(&[tbd, oneie]).unwrap();
        let event = merged.supergraph.document("d1").unwrap().get("[4:5)").unwrap();
        assert_eq!(event.relations_from("tear-tbd").len(), 1);
    }

    #[test]
    fn test_dangling_relation_aborts_by_default() {
        let tbd = temporal_corpus(
            "tear-tbd",
            SourceDocument {
                events: vec![temporal_event("[0:1)", "a", &[])],
                relations: vec![Relation::new("[9:10)", "[0:1)", 0.5)],
                mentions: vec![],
            },
        );
        let err = Merger::new().merge(&[tbd]).unwrap_err();
        match err {
            Error::UnknownEvent {
                doc_id, event_id, ..
            } => {
                assert_eq!(doc_id, "d1");
                assert_eq!(event_id, "[9:10)");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_dangling_relation_skip_policy() {
        let tbd = temporal_corpus(
            "tear-tbd",
            SourceDocument {
                events: vec![temporal_event("[0:1)", "a", &[])],
                relations: vec![
                    Relation::new("[9:10)", "[0:1)", 0.5),
                    Relation::new("[0:1)", "[9:10)", 0.5),
                ],
                mentions: vec![],
            },
        );
        let merged = Merger::new()
            .on_dangling(DanglingRelation::Skip)
            .merge(&[tbd])
            .unwrap();
        assert_eq!(merged.stats.relations_skipped, 1);
        assert_eq!(merged.stats.relations_attached, 1);
    }

    #[test]
    fn test_document_without_events_still_gets_an_entry() {
        let matres = temporal_corpus("tear-matres", SourceDocument::default());
        let events = Merger::new().merge_events(&[matres]).unwrap();
        assert!(events.graph().document("d1").unwrap().is_empty());
    }
}
