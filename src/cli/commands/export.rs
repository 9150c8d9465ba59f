//! Export command: one document graph as Cypher or NetworkX JSON

use clap::Parser;
use std::path::PathBuf;

use super::super::output::write_output;
use super::super::parser::ExportFormat;
use super::super::utils::read_supergraph;

use tempo_core::GraphDocument;

/// Export a document's event graph
#[derive(Parser, Debug)]
pub struct ExportArgs {
    /// Supergraph JSON file
    #[arg(short, long, value_name = "FILE")]
    pub input: PathBuf,

    /// Document id to export
    #[arg(long, value_name = "ID")]
    pub doc: String,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = ExportFormat::Cypher)]
    pub format: ExportFormat,

    /// Write to file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Entry point for `tempo export`.
pub fn cmd_export(args: ExportArgs) -> Result<(), String> {
    let supergraph = read_supergraph(&args.input)?;
    let graph = supergraph.document(&args.doc).ok_or_else(|| {
        format!(
            "document {:?} not found in {}",
            args.doc,
            args.input.display()
        )
    })?;

    let mut rendered = GraphDocument::from_document_graph(graph)
        .export(args.format.into())
        .map_err(|e| e.to_string())?;
    if !rendered.ends_with('\n') {
        rendered.push('\n');
    }
    write_output(&rendered, args.output.as_deref())
}
