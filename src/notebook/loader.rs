use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use super::structs::{CellKind, DocumentId, NotebookCell};

#[derive(Error, Debug)]
pub enum NotebookError {
    #[error("Failed to read notebook {0}: {1}")]
    Io(String, #[source] std::io::Error),
    #[error("Invalid notebook format: {0}")]
    Format(#[from] serde_json::Error),
}

/// nbformat stores source either as one string or as a list of line strings
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawSource {
    Text(String),
    Lines(Vec<String>),
}

impl RawSource {
    fn into_text(self) -> String {
        match self {
            RawSource::Text(text) => text,
            RawSource::Lines(lines) => lines.concat(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawCell {
    cell_type: String,
    #[serde(default)]
    source: Option<RawSource>,
}

#[derive(Debug, Deserialize)]
struct RawNotebook {
    cells: Vec<RawCell>,
}

fn cell_kind(cell_type: &str) -> CellKind {
    match cell_type {
        "code" => CellKind::Code,
        "markdown" => CellKind::Markdown,
        _ => CellKind::Raw,
    }
}

/// Decode nbformat v4 JSON into cells whose documents belong to `notebook_path`
pub fn parse_notebook(notebook_path: &Path, bytes: &[u8]) -> Result<Vec<NotebookCell>, NotebookError> {
    let raw: RawNotebook = serde_json::from_slice(bytes)?;

    let cells: Vec<NotebookCell> = raw
        .cells
        .into_iter()
        .enumerate()
        .map(|(index, cell)| NotebookCell {
            document: DocumentId::new(notebook_path, index),
            kind: cell_kind(&cell.cell_type),
            source: cell.source.map(RawSource::into_text),
        })
        .collect();

    debug!(
        notebook = %notebook_path.display(),
        cells = cells.len(),
        code_cells = cells.iter().filter(|c| c.is_code()).count(),
        "Loaded notebook"
    );
    Ok(cells)
}

pub fn load_notebook(notebook_path: &Path) -> Result<Vec<NotebookCell>, NotebookError> {
    let bytes = std::fs::read(notebook_path)
        .map_err(|e| NotebookError::Io(notebook_path.display().to_string(), e))?;
    parse_notebook(notebook_path, &bytes)
}
