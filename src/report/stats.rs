//! Coverage and agreement statistics over a merged document.

use crate::error::{Error, Result};
use std::collections::{BTreeMap, BTreeSet};
use tempo_core::{DocumentGraph, EventKey};

/// Number of confidence histogram bins over [0, 1].
pub const HISTOGRAM_BINS: usize = 10;

/// Relation statistics for one set of events.
#[derive(Debug, Clone, PartialEq)]
pub struct SubsetStats {
    /// Sources whose event sets were intersected
    pub sources: Vec<String>,
    /// Events in the intersection
    pub events: BTreeSet<EventKey>,
    /// Unique relations anchored on those events
    pub relation_count: usize,
    /// `good[i]` = relations with confidence >= `thresholds[i]`
    pub good: Vec<usize>,
}

impl SubsetStats {
    /// Fraction of relations at or above threshold `idx`.
    ///
    /// Fails with [`Error::DegenerateAggregate`] when the subset has no
    /// relations.
    pub fn ratio(&self, idx: usize) -> Result<f64> {
        if self.relation_count == 0 {
            return Err(Error::degenerate(format!(
                "no relations among events extracted by ({})",
                self.sources.join(", ")
            )));
        }
        let good = self.good.get(idx).copied().unwrap_or(0);
        Ok(good as f64 / self.relation_count as f64)
    }
}

/// The seven exclusive regions of a three-set Venn diagram.
///
/// Region ids follow the usual membership-string convention: `"110"` holds
/// events found by the first and second source but not the third.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VennRegions {
    /// The three sources, in diagram order
    pub sources: [String; 3],
    /// Region id to member events
    pub regions: BTreeMap<String, BTreeSet<EventKey>>,
}

impl VennRegions {
    /// All region ids, singletons first.
    pub const REGION_IDS: [&'static str; 7] = ["100", "010", "001", "110", "101", "011", "111"];

    /// Members of one region.
    #[must_use]
    pub fn region(&self, id: &str) -> Option<&BTreeSet<EventKey>> {
        self.regions.get(id)
    }

    /// The region an event falls into, if any source found it.
    #[must_use]
    pub fn region_of(&self, key: &str) -> Option<&str> {
        self.regions
            .iter()
            .find(|(_, members)| members.contains(key))
            .map(|(id, _)| id.as_str())
    }

    /// Region sizes keyed by region id.
    #[must_use]
    pub fn sizes(&self) -> BTreeMap<&str, usize> {
        self.regions
            .iter()
            .map(|(id, members)| (id.as_str(), members.len()))
            .collect()
    }
}

/// Everything the reports need about one document.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentStats {
    /// Document id
    pub doc_id: String,
    /// One entry per configured source
    pub per_source: Vec<SubsetStats>,
    /// Pairwise intersections, then the all-sources intersection
    pub intersections: Vec<SubsetStats>,
    /// Venn regions (three sources only)
    pub venn: Option<VennRegions>,
    /// Confidences of every unique relation in the document
    pub confidences: Vec<f64>,
}

/// Compute statistics for one document.
pub fn document_stats(
    doc_id: &str,
    graph: &DocumentGraph,
    sources: &[&str],
    thresholds: &[f64],
) -> DocumentStats {
    let event_sets: Vec<BTreeSet<EventKey>> = sources
        .iter()
        .map(|source| graph.events_from(source).map(|(k, _)| k.clone()).collect())
        .collect();

    let per_source = sources
        .iter()
        .zip(&event_sets)
        .map(|(source, events)| subset_stats(graph, &[*source], events.clone(), thresholds))
        .collect();

    let mut intersections = Vec::new();
    for i in 0..sources.len() {
        for j in (i + 1)..sources.len() {
            let events = event_sets[i].intersection(&event_sets[j]).cloned().collect();
            intersections.push(subset_stats(
                graph,
                &[sources[i], sources[j]],
                events,
                thresholds,
            ));
        }
    }
    if sources.len() > 2 {
        let all = event_sets
            .iter()
            .skip(1)
            .fold(event_sets[0].clone(), |acc, set| {
                acc.intersection(set).cloned().collect()
            });
        intersections.push(subset_stats(graph, sources, all, thresholds));
    }

    let venn = if sources.len() == 3 {
        Some(venn_regions(sources, &event_sets))
    } else {
        log::warn!(
            "document '{}': Venn diagram needs exactly three sources, have {}",
            doc_id,
            sources.len()
        );
        None
    };

    DocumentStats {
        doc_id: doc_id.to_string(),
        per_source,
        intersections,
        venn,
        confidences: relation_confidences(graph),
    }
}

fn subset_stats(
    graph: &DocumentGraph,
    sources: &[&str],
    events: BTreeSet<EventKey>,
    thresholds: &[f64],
) -> SubsetStats {
    let confidences: Vec<f64> = events
        .iter()
        .filter_map(|key| graph.get(key.as_str()))
        .flat_map(|event| event.unique_relations())
        .map(|relation| relation.confidence)
        .collect();

    SubsetStats {
        sources: sources.iter().map(|s| s.to_string()).collect(),
        events,
        relation_count: confidences.len(),
        good: good_relations(&confidences, thresholds),
    }
}

/// Count confidences at or above each threshold.
///
/// Each threshold is counted independently, so with ascending thresholds the
/// counts never increase.
#[must_use]
pub fn good_relations(confidences: &[f64], thresholds: &[f64]) -> Vec<usize> {
    thresholds
        .iter()
        .map(|t| confidences.iter().filter(|c| *c >= t).count())
        .collect()
}

/// Confidences of every unique relation in the document.
#[must_use]
pub fn relation_confidences(graph: &DocumentGraph) -> Vec<f64> {
    graph
        .iter()
        .flat_map(|(_, event)| event.unique_relations())
        .map(|relation| relation.confidence)
        .collect()
}

/// Bin confidences into [`HISTOGRAM_BINS`] equal bins over [0, 1].
///
/// The last bin is closed, so a confidence of exactly 1.0 is counted.
/// Values outside [0, 1] are ignored. Bin membership is checked against the
/// edges `i * 0.1`, the same floating-point edges numpy uses, so 0.3 lands in
/// bin 2.
#[must_use]
pub fn histogram(confidences: &[f64]) -> [usize; HISTOGRAM_BINS] {
    let mut bins = [0usize; HISTOGRAM_BINS];
    for &c in confidences {
        if !(0.0..=1.0).contains(&c) {
            continue;
        }
        let mut idx = ((c * HISTOGRAM_BINS as f64) as usize).min(HISTOGRAM_BINS - 1);
        if c < bin_edge(idx) {
            idx -= 1;
        } else if idx + 1 < HISTOGRAM_BINS && c >= bin_edge(idx + 1) {
            idx += 1;
        }
        bins[idx] += 1;
    }
    bins
}

/// Lower edge of bin `i`; edge [`HISTOGRAM_BINS`] is exactly 1.0.
fn bin_edge(i: usize) -> f64 {
    if i >= HISTOGRAM_BINS {
        1.0
    } else {
        i as f64 * (1.0 / HISTOGRAM_BINS as f64)
    }
}

fn venn_regions(sources: &[&str], event_sets: &[BTreeSet<EventKey>]) -> VennRegions {
    let mut regions: BTreeMap<String, BTreeSet<EventKey>> = VennRegions::REGION_IDS
        .iter()
        .map(|id| (id.to_string(), BTreeSet::new()))
        .collect();

    let union: BTreeSet<&EventKey> = event_sets.iter().flatten().collect();
    for key in union {
        let id: String = event_sets
            .iter()
            .map(|set| if set.contains(key) { '1' } else { '0' })
            .collect();
        regions.entry(id).or_default().insert(key.clone());
    }

    VennRegions {
        sources: [
            sources[0].to_string(),
            sources[1].to_string(),
            sources[2].to_string(),
        ],
        regions,
    }
}
