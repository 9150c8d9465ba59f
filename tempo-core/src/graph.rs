//! Document graphs and the corpus-level supergraph.
//!
//! Both levels are ordered maps, so serializing the same supergraph twice
//! yields byte-identical JSON.

use crate::error::Result;
use crate::event::Event;
use crate::span::EventKey;
use serde::{Deserialize, Serialize};
use std::collections::btree_map::{self, BTreeMap};
use std::fs;
use std::path::Path;

/// All merged events of one document, keyed by event key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentGraph {
    events: BTreeMap<EventKey, Event>,
}

impl DocumentGraph {
    /// Create an empty document graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up an event.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Event> {
        self.events.get(key)
    }

    /// Look up an event mutably.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Event> {
        self.events.get_mut(key)
    }

    /// Check whether an event key is present.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.events.contains_key(key)
    }

    /// Insert an event, returning the one it replaced.
    pub fn insert(&mut self, key: EventKey, event: Event) -> Option<Event> {
        self.events.insert(key, event)
    }

    /// Remove an event.
    pub fn remove(&mut self, key: &str) -> Option<Event> {
        self.events.remove(key)
    }

    /// Entry API over the underlying map.
    pub fn entry(&mut self, key: EventKey) -> btree_map::Entry<'_, EventKey, Event> {
        self.events.entry(key)
    }

    /// Iterate events in key order.
    pub fn iter(&self) -> btree_map::Iter<'_, EventKey, Event> {
        self.events.iter()
    }

    /// Iterate event keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &EventKey> {
        self.events.keys()
    }

    /// Events discovered by `source`.
    pub fn events_from<'a>(
        &'a self,
        source: &'a str,
    ) -> impl Iterator<Item = (&'a EventKey, &'a Event)> + 'a {
        self.events.iter().filter(move |(_, e)| e.has_source(source))
    }

    /// Number of events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Check if the graph has no events.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of stored relations, duplicates across sources included.
    #[must_use]
    pub fn relation_count(&self) -> usize {
        self.events.values().map(|e| e.all_relations().count()).sum()
    }
}

impl<'a> IntoIterator for &'a DocumentGraph {
    type Item = (&'a EventKey, &'a Event);
    type IntoIter = btree_map::Iter<'a, EventKey, Event>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}

impl FromIterator<(EventKey, Event)> for DocumentGraph {
    fn from_iter<I: IntoIterator<Item = (EventKey, Event)>>(iter: I) -> Self {
        Self {
            events: iter.into_iter().collect(),
        }
    }
}

/// Summary counts over a supergraph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GraphStats {
    /// Number of documents
    pub documents: usize,
    /// Number of events across all documents
    pub events: usize,
    /// Number of stored relations across all documents
    pub relations: usize,
}

/// The merged, provenance-tagged union of every source, keyed by document id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Supergraph {
    documents: BTreeMap<String, DocumentGraph>,
}

impl Supergraph {
    /// Create an empty supergraph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a document graph.
    #[must_use]
    pub fn document(&self, doc_id: &str) -> Option<&DocumentGraph> {
        self.documents.get(doc_id)
    }

    /// Look up a document graph mutably.
    pub fn document_mut(&mut self, doc_id: &str) -> Option<&mut DocumentGraph> {
        self.documents.get_mut(doc_id)
    }

    /// Get a document graph, creating an empty one on first touch.
    pub fn document_or_default(&mut self, doc_id: &str) -> &mut DocumentGraph {
        self.documents.entry(doc_id.to_string()).or_default()
    }

    /// Insert a whole document graph.
    pub fn insert(&mut self, doc_id: impl Into<String>, graph: DocumentGraph) {
        self.documents.insert(doc_id.into(), graph);
    }

    /// Iterate documents in id order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, DocumentGraph> {
        self.documents.iter()
    }

    /// Iterate document ids in order.
    pub fn doc_ids(&self) -> impl Iterator<Item = &str> {
        self.documents.keys().map(String::as_str)
    }

    /// Number of documents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Check if the supergraph has no documents.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Count documents, events, and relations.
    #[must_use]
    pub fn stats(&self) -> GraphStats {
        GraphStats {
            documents: self.documents.len(),
            events: self.documents.values().map(DocumentGraph::len).sum(),
            relations: self
                .documents
                .values()
                .map(DocumentGraph::relation_count)
                .sum(),
        }
    }

    /// Serialize to compact JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serialize to indented JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a serialized supergraph.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Write the supergraph to `path`, creating parent directories.
    pub fn write_to(&self, path: impl AsRef<Path>, pretty: bool) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let json = if pretty {
            self.to_json_pretty()?
        } else {
            self.to_json()?
        };
        fs::write(path, json)?;
        Ok(())
    }

    /// Read a supergraph previously written with [`Supergraph::write_to`].
    pub fn read_from(path: impl AsRef<Path>) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

impl<'a> IntoIterator for &'a Supergraph {
    type Item = (&'a String, &'a DocumentGraph);
    type IntoIter = btree_map::Iter<'a, String, DocumentGraph>;

    fn into_iter(self) -> Self::IntoIter {
        self.documents.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Relation;

    fn event_from(text: &str, sources: &[&str]) -> Event {
        let mut event = Event::new(text);
        for source in sources {
            event.provenance.record(*source);
        }
        event
    }

    #[test]
    fn test_document_or_default_creates_once() {
        let mut graph = Supergraph::new();
        graph
            .document_or_default("d1")
            .insert("[0:1)".into(), event_from("ran", &["oneie"]));
        graph.document_or_default("d1");
        assert_eq!(graph.len(), 1);
        assert_eq!(graph.document("d1").unwrap().len(), 1);
    }

    #[test]
    fn test_events_from_filters_by_provenance() {
        let doc: DocumentGraph = [
            ("[0:1)".into(), event_from("a", &["oneie", "tear-tbd"])),
            ("[2:3)".into(), event_from("b", &["tear-tbd"])),
            ("[4:5)".into(), event_from("c", &["oneie"])),
        ]
        .into_iter()
        .collect();

        let keys: Vec<&str> = doc.events_from("oneie").map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["[0:1)", "[4:5)"]);
    }

    #[test]
    fn test_stats_count_relations() {
        let mut event = event_from("a", &["tear-tbd"]);
        event.push_relation("tear-tbd", Relation::new("[0:1)", "[2:3)", 0.5));
        event.push_relation("tear-matres", Relation::new("[0:1)", "[2:3)", 0.5));
        let mut graph = Supergraph::new();
        graph.document_or_default("d1").insert("[0:1)".into(), event);

        let stats = graph.stats();
        assert_eq!(stats.documents, 1);
        assert_eq!(stats.events, 1);
        assert_eq!(stats.relations, 2);
    }

    #[test]
    fn test_json_is_deterministic() {
        let mut graph = Supergraph::new();
        for doc in ["b", "a", "c"] {
            let g = graph.document_or_default(doc);
            g.insert("[9:10)".into(), event_from("x", &["oneie"]));
            g.insert("[1:2)".into(), event_from("y", &["oneie"]));
        }
        let first = graph.to_json().unwrap();
        let reparsed = Supergraph::from_json(&first).unwrap();
        assert_eq!(reparsed.to_json().unwrap(), first);
        assert!(first.starts_with("{\"a\":"));
    }
}
