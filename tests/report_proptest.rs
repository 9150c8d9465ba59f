//! Property-based tests for report statistics.

use proptest::prelude::*;
use std::collections::BTreeSet;

use tempo::report::{document_stats, good_relations, histogram, VennRegions};
use tempo::{DocumentGraph, Event, Relation};

const SOURCES: [&str; 3] = ["oneie", "tear-tbd", "tear-matres"];

/// Events as (position, membership bitmask, relation confidences).
fn graph_strategy() -> impl Strategy<Value = Vec<(usize, u8, Vec<f64>)>> {
    prop::collection::vec(
        (0usize..50, 1u8..8, prop::collection::vec(0.0f64..=1.0, 0..4)),
        0..12,
    )
}

fn build_graph(events: &[(usize, u8, Vec<f64>)]) -> DocumentGraph {
    let mut graph = DocumentGraph::new();
    for (pos, mask, confidences) in events {
        let key = format!("[{}:{})", pos, pos + 1);
        let mut event = Event::new("e");
        for (bit, source) in SOURCES.iter().enumerate() {
            if mask & (1 << bit) != 0 {
                event.provenance.record(*source);
            }
        }
        for (idx, conf) in confidences.iter().enumerate() {
            let target = format!("[{}:{})", 100 + idx, 101 + idx);
            event.push_relation("tear-tbd", Relation::new(key.as_str(), target, *conf));
        }
        graph.insert(key.into(), event);
    }
    graph
}

proptest! {
    #[test]
    fn good_counts_never_increase(
        confidences in prop::collection::vec(0.0f64..=1.0, 0..30),
        mut thresholds in prop::collection::vec(0.0f64..=1.0, 1..5),
    ) {
        thresholds.sort_by(|a, b| a.partial_cmp(b).unwrap());
        let good = good_relations(&confidences, &thresholds);
        prop_assert_eq!(good.len(), thresholds.len());
        prop_assert!(good.iter().all(|&g| g <= confidences.len()));
        prop_assert!(good.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn histogram_counts_every_in_range_value(
        confidences in prop::collection::vec(-0.5f64..1.5, 0..40),
    ) {
        let in_range = confidences.iter().filter(|c| (0.0..=1.0).contains(*c)).count();
        prop_assert_eq!(histogram(&confidences).iter().sum::<usize>(), in_range);
    }

    #[test]
    fn venn_regions_partition_the_events(events in graph_strategy()) {
        let graph = build_graph(&events);
        let stats = document_stats("d", &graph, &SOURCES, &[0.5]);
        let venn = stats.venn.unwrap();

        let mut seen = BTreeSet::new();
        for id in VennRegions::REGION_IDS {
            for key in venn.region(id).unwrap() {
                prop_assert!(seen.insert(key.clone()), "{} in two regions", key);
            }
        }
        let all: BTreeSet<_> = graph.keys().cloned().collect();
        prop_assert_eq!(seen, all);
    }

    #[test]
    fn intersections_are_no_larger_than_their_members(events in graph_strategy()) {
        let graph = build_graph(&events);
        let stats = document_stats("d", &graph, &SOURCES, &[0.5, 0.9]);

        let smallest = stats.per_source.iter().map(|s| s.events.len()).min().unwrap();
        let everyone = stats.intersections.last().unwrap();
        prop_assert_eq!(everyone.sources.len(), 3);
        prop_assert!(everyone.events.len() <= smallest);
        for subset in &stats.intersections {
            prop_assert!(subset.good[0] >= subset.good[1]);
            prop_assert!(subset.good[0] <= subset.relation_count);
        }
    }
}
