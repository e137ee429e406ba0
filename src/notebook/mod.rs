pub mod loader;
pub mod structs;

pub use loader::{load_notebook, parse_notebook, NotebookError};
pub use structs::{CellKind, DocumentId, NotebookCell};
