//! Read a source's output files into a [`SourceCorpus`].

use crate::config::SourceConfig;
use crate::error::{Error, Result};
use crate::ingest::records::{JointIeSegment, TemporalDocumentRecord};
use crate::normalize::normalize_document;
use glob::{glob, Pattern};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempo_core::{SourceCorpus, SourceDocument, SourceKind};

/// Load every file of one source.
///
/// Files are read in sorted path order. A document id that appears in two
/// files is taken from the later one.
pub fn read_source(config: &SourceConfig, data_dir: &Path) -> Result<SourceCorpus> {
    let dir = data_dir.join(&config.path);
    if !dir.is_dir() {
        return Err(Error::invalid_input(format!(
            "source '{}': directory {} does not exist",
            config.name,
            dir.display()
        )));
    }

    let paths = source_files(&dir, &config.pattern)?;
    if paths.is_empty() {
        log::warn!(
            "source '{}': no files match '{}' in {}",
            config.name,
            config.pattern,
            dir.display()
        );
    }

    let mut corpus = SourceCorpus::new(&config.name, config.kind);
    for path in &paths {
        log::debug!("reading {} ({})", path.display(), config.name);
        for (doc_id, document) in read_file(path, config.kind)? {
            if corpus.insert(doc_id.clone(), document).is_some() {
                log::warn!(
                    "source '{}': document '{}' appears again in {}; keeping the later copy",
                    config.name,
                    doc_id,
                    path.display()
                );
            }
        }
    }

    log::info!(
        "loaded '{}': {} files, {} documents, {} events, {} relations",
        config.name,
        paths.len(),
        corpus.len(),
        corpus.event_count(),
        corpus.relation_count()
    );
    Ok(corpus)
}

/// Files under `dir` matching `pattern`, sorted.
pub fn source_files(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let dir_str = dir
        .to_str()
        .ok_or_else(|| Error::invalid_input(format!("non UTF-8 path {}", dir.display())))?;
    let full = format!("{}/{}", Pattern::escape(dir_str), pattern);
    let mut paths = glob(&full)
        .map_err(|e| Error::config(format!("invalid file pattern '{}': {}", pattern, e)))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::Io(e.into_error()))?;
    paths.retain(|p| p.is_file());
    paths.sort();
    Ok(paths)
}

fn read_file(path: &Path, kind: SourceKind) -> Result<Vec<(String, SourceDocument)>> {
    let text = fs::read_to_string(path)?;
    let records = parse_json_or_jsonl(&text).map_err(|e| in_file(path, e))?;

    match kind {
        SourceKind::JointIe => {
            let segments: Vec<JointIeSegment> =
                decode_records(records).map_err(|e| in_file(path, e))?;
            let Some(first) = segments.first() else {
                return Err(in_file(path, Error::parse("no segments")));
            };
            let doc_id = first.doc_id.clone();
            for segment in &segments[1..] {
                if segment.doc_id != doc_id {
                    log::warn!(
                        "{}: segment of '{}' filed under '{}'",
                        path.display(),
                        segment.doc_id,
                        doc_id
                    );
                }
            }
            let document = normalize_document(&doc_id, &segments)?;
            Ok(vec![(doc_id, document)])
        }
        SourceKind::Temporal => {
            let documents: Vec<TemporalDocumentRecord> =
                decode_records(records).map_err(|e| in_file(path, e))?;
            Ok(documents
                .into_iter()
                .map(|record| (record.doc_id.clone(), SourceDocument::from(record)))
                .collect())
        }
    }
}

/// Parse text as one JSON value, falling back to JSON Lines.
///
/// A top-level list yields its elements; a single object yields itself.
pub fn parse_json_or_jsonl(text: &str) -> Result<Vec<Value>> {
    let json_err = match serde_json::from_str::<Value>(text) {
        Ok(value) => return into_records(value),
        Err(e) => e,
    };

    log::debug!("not a single JSON value ({}); trying JSON Lines", json_err);
    let mut records = Vec::new();
    for (lineno, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let value: Value = serde_json::from_str(line).map_err(|line_err| {
            Error::parse(format!(
                "neither JSON ({}) nor JSON Lines (line {}: {})",
                json_err,
                lineno + 1,
                line_err
            ))
        })?;
        records.push(value);
    }
    if records.is_empty() {
        return Err(Error::parse(format!("no JSON content ({})", json_err)));
    }
    Ok(records)
}

fn into_records(value: Value) -> Result<Vec<Value>> {
    match value {
        Value::Array(items) => Ok(items),
        Value::Object(_) => Ok(vec![value]),
        other => Err(Error::parse(format!(
            "expected a list of records, found {}",
            other
        ))),
    }
}

fn decode_records<T: DeserializeOwned>(records: Vec<Value>) -> Result<Vec<T>> {
    records
        .into_iter()
        .enumerate()
        .map(|(idx, value)| {
            serde_json::from_value(value)
                .map_err(|e| Error::parse(format!("record {}: {}", idx, e)))
        })
        .collect()
}

fn in_file(path: &Path, err: Error) -> Error {
    match err {
        Error::Parse(msg) => Error::parse(format!("{}: {}", path.display(), msg)),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_list() {
        let records = parse_json_or_jsonl(r#"[{"a": 1}, {"a": 2}]"#).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_parse_jsonl_fallback() {
        let records = parse_json_or_jsonl("{\"a\": 1}\n\n{\"a\": 2}\n").unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1]["a"], 2);
    }

    #[test]
    fn test_single_object_is_one_record() {
        assert_eq!(parse_json_or_jsonl(r#"{"a": 1}"#).unwrap().len(), 1);
    }

    #[test]
    fn test_garbage_reports_both_causes() {
        let err = parse_json_or_jsonl("{\"a\": 1}\nnot json\n").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("neither JSON"), "{}", msg);
        assert!(msg.contains("line 2"), "{}", msg);
    }

    #[test]
    fn test_scalar_is_rejected() {
        assert!(parse_json_or_jsonl("42").is_err());
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let dir = TempDir::new().unwrap();
        let config = SourceConfig::new("tear-tbd", SourceKind::Temporal, "tear/tbd");
        assert!(matches!(
            read_source(&config, dir.path()),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_empty_directory_yields_empty_corpus() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("tbd")).unwrap();
        let config = SourceConfig::new("tear-tbd", SourceKind::Temporal, "tbd");
        let corpus = read_source(&config, dir.path()).unwrap();
        assert!(corpus.is_empty());
    }

    #[test]
    fn test_later_file_wins_for_duplicate_document() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("tbd");
        fs::create_dir_all(&src).unwrap();
        fs::write(
            src.join("a.json"),
            r#"[{"doc_id": "d1", "events": [], "relations": [], "mentions": []}]"#,
        )
        .unwrap();
        fs::write(
            src.join("b.json"),
            r#"[{"doc_id": "d1", "events": [{"event_id": "[0:1)", "text": "x"}], "relations": [], "mentions": []}]"#,
        )
        .unwrap();
        fs::write(src.join("notes.txt"), "ignored").unwrap();

        let config = SourceConfig::new("tear-tbd", SourceKind::Temporal, "tbd");
        let corpus = read_source(&config, dir.path()).unwrap();
        assert_eq!(corpus.len(), 1);
        assert_eq!(corpus.documents["d1"].events.len(), 1);
    }

    #[test]
    fn test_empty_joint_ie_file_is_a_parse_error() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("oneie");
        fs::create_dir_all(&src).unwrap();
        fs::write(src.join("d1.json"), "[]").unwrap();

        let config = SourceConfig::new("oneie", SourceKind::JointIe, "oneie");
        let err = read_source(&config, dir.path()).unwrap_err();
        assert!(matches!(err, Error::Parse(ref msg) if msg.contains("d1.json")));
    }
}
