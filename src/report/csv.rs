//! Flat CSV appendix: one row per merged event.

use crate::config::PipelineConfig;
use crate::error::Result;
use tempo_core::Supergraph;

/// Placeholder for events no source typed.
pub const MISSING_TYPE: &str = "--";

/// Column names for `config`'s sources.
#[must_use]
pub fn header(config: &PipelineConfig) -> Vec<String> {
    let mut columns = vec![
        "event_token".to_string(),
        "event_span".to_string(),
        "doc_id".to_string(),
    ];
    for source in &config.sources {
        columns.push(format!("source_{}", source.label()));
    }
    columns.push("type".to_string());
    for source in config.relation_sources() {
        columns.push(format!("has_relations_{}", source.label()));
        columns.push(format!("events_AFTER_{}", source.label()));
    }
    columns
}

/// Render the appendix.
///
/// Relation target lists are written as JSON arrays of event keys.
pub fn render_csv(supergraph: &Supergraph, config: &PipelineConfig) -> Result<String> {
    let mut out = String::new();
    write_record(&mut out, &header(config));

    for (doc_id, graph) in supergraph {
        for (key, event) in graph {
            let mut row = vec![event.text.clone(), key.to_string(), doc_id.clone()];
            for source in &config.sources {
                row.push(flag(event.has_source(&source.name)));
            }
            row.push(
                event
                    .event_type
                    .clone()
                    .unwrap_or_else(|| MISSING_TYPE.to_string()),
            );
            for source in config.relation_sources() {
                let targets: Vec<&str> = event
                    .relations_from(&source.name)
                    .iter()
                    .map(|r| r.event2_id.as_str())
                    .collect();
                row.push(flag(!targets.is_empty()));
                row.push(serde_json::to_string(&targets)?);
            }
            write_record(&mut out, &row);
        }
    }

    Ok(out)
}

fn flag(set: bool) -> String {
    u8::from(set).to_string()
}

/// Append one CRLF-terminated record, quoting fields as needed.
fn write_record(out: &mut String, fields: &[String]) {
    let line: Vec<String> = fields.iter().map(|f| escape_field(f)).collect();
    out.push_str(&line.join(","));
    out.push_str("\r\n");
}

fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
