//! Reports over a finished supergraph.
//!
//! Nothing here mutates the supergraph. [`write_reports`] produces, under the
//! analysis directory:
//!
//! ```text
//! <date>.txt                       coverage and agreement per document
//! appendix/<date>.csv              one row per event
//! figures/<doc>_relation_dist.svg  confidence histogram
//! figures/<doc>_venn.svg           three-source Venn diagram
//! ```

pub mod chart;
pub mod csv;
pub mod stats;
pub mod text;

pub use stats::{document_stats, good_relations, histogram, DocumentStats, SubsetStats, VennRegions};

use crate::config::PipelineConfig;
use crate::error::Result;
use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};
use tempo_core::Supergraph;

/// Files written by [`write_reports`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportPaths {
    /// Text report
    pub text: PathBuf,
    /// CSV appendix
    pub csv: PathBuf,
    /// SVG figures, in document order
    pub figures: Vec<PathBuf>,
}

/// Compute statistics for every document, in id order.
#[must_use]
pub fn corpus_stats(supergraph: &Supergraph, config: &PipelineConfig) -> Vec<DocumentStats> {
    let sources = config.source_names();
    supergraph
        .iter()
        .map(|(doc_id, graph)| document_stats(doc_id, graph, &sources, &config.thresholds))
        .collect()
}

/// Render the full text report.
pub fn render_text_report(stats: &[DocumentStats], config: &PipelineConfig) -> Result<String> {
    let mut out = String::new();
    for doc in stats {
        out.push_str(&text::render_document(
            doc,
            &config.thresholds,
            config.strict_ratios,
        )?);
    }
    Ok(out)
}

/// Write the text report, CSV appendix, and (optionally) figures.
///
/// The text report is rendered in full before anything is written, so a
/// degenerate ratio in strict mode leaves no partial files behind.
pub fn write_reports(
    supergraph: &Supergraph,
    config: &PipelineConfig,
    date: NaiveDate,
) -> Result<ReportPaths> {
    let stats = corpus_stats(supergraph, config);
    let report = render_text_report(&stats, config)?;
    let appendix = csv::render_csv(supergraph, config)?;

    let stamp = date.format("%Y-%m-%d").to_string();
    let dir = &config.analysis_dir;
    let mut paths = ReportPaths {
        text: dir.join(format!("{}.txt", stamp)),
        csv: dir.join("appendix").join(format!("{}.csv", stamp)),
        figures: Vec::new(),
    };

    write_file(&paths.text, &report)?;
    write_file(&paths.csv, &appendix)?;

    if config.figures {
        let figures = dir.join("figures");
        let labels: Vec<&str> = config.sources.iter().map(|s| s.label()).collect();
        for doc in &stats {
            let stem = file_stem(&doc.doc_id);
            let hist = figures.join(format!("{}_relation_dist.svg", stem));
            write_file(&hist, &chart::render_histogram(&doc.doc_id, &doc.confidences))?;
            paths.figures.push(hist);

            if let Some(venn) = &doc.venn {
                let venn_path = figures.join(format!("{}_venn.svg", stem));
                let labels = [labels[0], labels[1], labels[2]];
                write_file(&venn_path, &chart::render_venn(venn, labels))?;
                paths.figures.push(venn_path);
            }
        }
    }

    log::info!(
        "wrote report for {} documents to {} ({} figures)",
        stats.len(),
        dir.display(),
        paths.figures.len()
    );
    Ok(paths)
}

/// A document id made safe for use as a single file name component.
fn file_stem(doc_id: &str) -> String {
    doc_id
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '_' | '-' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)?;
    log::debug!("wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use tempo_core::{Event, Relation};

    fn supergraph() -> Supergraph {
        let mut event = Event::new("attacked");
        event.provenance.record("oneie");
        event.provenance.record("tear-tbd");
        event.provenance.record("tear-matres");
        event.push_relation("tear-tbd", Relation::new("[0:1)", "[2:3)", 0.9));

        let mut graph = Supergraph::new();
        graph.document_or_default("d1").insert("[0:1)".into(), event);
        graph
    }

    fn config(dir: &Path) -> PipelineConfig {
        PipelineConfig {
            analysis_dir: dir.to_path_buf(),
            ..PipelineConfig::default()
        }
    }

    #[test]
    fn test_write_reports_layout() {
        let dir = TempDir::new().unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let paths = write_reports(&supergraph(), &config(dir.path()), date).unwrap();

        assert_eq!(paths.text, dir.path().join("2024-03-01.txt"));
        assert!(paths.csv.ends_with("appendix/2024-03-01.csv"));
        assert_eq!(paths.figures.len(), 2);
        assert!(dir.path().join("figures/d1_venn.svg").is_file());

        let report = fs::read_to_string(&paths.text).unwrap();
        assert!(report.starts_with("Doc ID: d1\n"));
    }

    #[test]
    fn test_strict_failure_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let mut graph = Supergraph::new();
        let mut event = Event::new("said");
        event.provenance.record("oneie");
        graph.document_or_default("d1").insert("[0:1)".into(), event);

        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert!(write_reports(&graph, &config(dir.path()), date).is_err());
        assert!(!dir.path().join("2024-03-01.txt").exists());
    }

    #[test]
    fn test_figure_names_stay_inside_figures_dir() {
        let dir = TempDir::new().unwrap();
        let analysis = dir.path().join("analysis");
        let mut graph = supergraph();
        let event = graph.document("d1").unwrap().clone();
        graph.insert("../../escape", event);

        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let paths = write_reports(&graph, &config(&analysis), date).unwrap();

        let figures = analysis.join("figures");
        assert!(paths.figures.iter().all(|p| p.parent() == Some(figures.as_path())));
        assert!(figures.join(".._.._escape_venn.svg").is_file());
        assert!(!dir.path().join("escape_venn.svg").exists());
    }

    #[test]
    fn test_file_stem() {
        assert_eq!(file_stem("nyt_0001"), "nyt_0001");
        assert_eq!(file_stem("a/b\\c:d"), "a_b_c_d");
    }

    #[test]
    fn test_figures_can_be_disabled() {
        let dir = TempDir::new().unwrap();
        let config = PipelineConfig {
            figures: false,
            ..config(dir.path())
        };
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let paths = write_reports(&supergraph(), &config, date).unwrap();
        assert!(paths.figures.is_empty());
        assert!(!dir.path().join("figures").exists());
    }
}
