//! Plain-text coverage report.

use crate::error::Result;
use crate::report::stats::{DocumentStats, SubsetStats};

/// Document separator line.
pub const SEPARATOR: &str = "- - - - - - - - - -";

/// Render the report block for one document.
///
/// With `strict`, a ratio over zero relations is an error; otherwise it
/// renders as `n/a`.
pub fn render_document(stats: &DocumentStats, thresholds: &[f64], strict: bool) -> Result<String> {
    let mut out = String::new();
    out.push_str(&format!("Doc ID: {}\n", stats.doc_id));

    let headline = thresholds.first().copied().unwrap_or_default();
    for subset in &stats.per_source {
        out.push_str(&format!(
            "\tEvents extracted by '{}': {}; % relations conf >= {:.0}%: {}\n",
            subset.sources.join(", "),
            subset.events.len(),
            headline * 100.0,
            format_ratio(subset, 0, &stats.doc_id, strict)?
        ));
    }

    for subset in &stats.intersections {
        out.push_str(&format!(
            "\tEvents extracted by {}: {}; Num of relations: {}\n",
            source_tuple(&subset.sources),
            subset.events.len(),
            subset.relation_count
        ));
        for (idx, threshold) in thresholds.iter().enumerate() {
            out.push_str(&format!(
                "\t\tRelations in set with confidence >= {}: {}; as percentage: {}\n",
                threshold,
                subset.good.get(idx).copied().unwrap_or(0),
                format_ratio(subset, idx, &stats.doc_id, strict)?
            ));
        }
    }

    out.push_str(SEPARATOR);
    out.push('\n');
    Ok(out)
}

/// Sources as a quoted tuple, `('a', 'b')`.
fn source_tuple(sources: &[String]) -> String {
    let quoted: Vec<String> = sources.iter().map(|s| format!("'{}'", s)).collect();
    match quoted.as_slice() {
        [only] => format!("({},)", only),
        _ => format!("({})", quoted.join(", ")),
    }
}

fn format_ratio(subset: &SubsetStats, idx: usize, doc_id: &str, strict: bool) -> Result<String> {
    match subset.ratio(idx) {
        Ok(ratio) => Ok(format!("{:.2}", ratio)),
        Err(e) if strict => {
            log::error!("document '{}': {}", doc_id, e);
            Err(e)
        }
        Err(_) => Ok("n/a".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::collections::BTreeSet;

    fn subset(sources: &[&str], events: usize, relation_count: usize, good: Vec<usize>) -> SubsetStats {
        SubsetStats {
            sources: sources.iter().map(|s| s.to_string()).collect(),
            events: (0..events).map(|i| format!("[{}:{})", i, i + 1).into()).collect::<BTreeSet<_>>(),
            relation_count,
            good,
        }
    }

    fn stats(pair_relations: usize) -> DocumentStats {
        DocumentStats {
            doc_id: "d1".into(),
            per_source: vec![
                subset(&["oneie"], 3, 4, vec![3, 2, 1]),
                subset(&["tear-tbd"], 2, 2, vec![1, 0, 0]),
            ],
            intersections: vec![subset(
                &["oneie", "tear-tbd"],
                1,
                pair_relations,
                vec![pair_relations; 3],
            )],
            venn: None,
            confidences: vec![],
        }
    }

    #[test]
    fn test_report_lines() {
        let text = render_document(&stats(2), &[0.75, 0.85, 0.95], true).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Doc ID: d1");
        assert_eq!(
            lines[1],
            "\tEvents extracted by 'oneie': 3; % relations conf >= 75%: 0.75"
        );
        assert_eq!(
            lines[3],
            "\tEvents extracted by ('oneie', 'tear-tbd'): 1; Num of relations: 2"
        );
        assert_eq!(
            lines[4],
            "\t\tRelations in set with confidence >= 0.75: 2; as percentage: 1.00"
        );
        assert_eq!(lines.last().copied(), Some(SEPARATOR));
    }

    #[test]
    fn test_source_tuple() {
        let names = |xs: &[&str]| xs.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        assert_eq!(
            source_tuple(&names(&["oneie", "tear-tbd", "tear-matres"])),
            "('oneie', 'tear-tbd', 'tear-matres')"
        );
        assert_eq!(source_tuple(&names(&["oneie"])), "('oneie',)");
    }

    #[test]
    fn test_strict_mode_fails_on_empty_subset() {
        let err = render_document(&stats(0), &[0.75], true).unwrap_err();
        assert!(matches!(err, Error::DegenerateAggregate(_)));
    }

    #[test]
    fn test_lenient_mode_renders_na() {
        let text = render_document(&stats(0), &[0.75], false).unwrap();
        assert!(text.contains("as percentage: n/a"));
    }
}
