use std::path::Path;

use crate::annotations::AnnotationRecord;
use crate::notebook::{DocumentId, NotebookCell, NotebookError};

/// Editor-side collaborator the session drives
#[cfg_attr(test, mockall::automock)]
pub trait EditorHost {
    /// Enumerate the notebook's cells in position order
    fn notebook_cells(&self, notebook: &Path) -> Result<Vec<NotebookCell>, NotebookError>;

    /// Documents currently shown in an editor
    fn visible_documents(&self) -> Vec<DocumentId>;

    /// Replace the decorations shown for `document`
    fn apply_decorations(&self, document: &DocumentId, records: &[AnnotationRecord]);

    /// Install the hover provider; called once per session
    fn register_hover_provider(&self);

    fn notify_info(&self, message: &str);

    fn notify_error(&self, message: &str);
}
