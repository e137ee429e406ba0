use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Identity of one annotatable source document: a single notebook cell
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DocumentId {
    pub notebook: PathBuf,
    pub cell_index: usize,
}

impl DocumentId {
    pub fn new(notebook: impl Into<PathBuf>, cell_index: usize) -> Self {
        Self {
            notebook: notebook.into(),
            cell_index,
        }
    }

    pub fn belongs_to(&self, notebook: &Path) -> bool {
        self.notebook == notebook
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#cell{}", self.notebook.display(), self.cell_index)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellKind {
    Code,
    Markdown,
    Raw,
}

/// A notebook cell as enumerated by the host
#[derive(Debug, Clone, PartialEq)]
pub struct NotebookCell {
    pub document: DocumentId,
    pub kind: CellKind,
    /// `None` when the host could not retrieve the cell's text
    pub source: Option<String>,
}

impl NotebookCell {
    pub fn code(document: DocumentId, source: impl Into<String>) -> Self {
        Self {
            document,
            kind: CellKind::Code,
            source: Some(source.into()),
        }
    }

    pub fn markdown(document: DocumentId, source: impl Into<String>) -> Self {
        Self {
            document,
            kind: CellKind::Markdown,
            source: Some(source.into()),
        }
    }

    pub fn is_code(&self) -> bool {
        self.kind == CellKind::Code
    }
}
