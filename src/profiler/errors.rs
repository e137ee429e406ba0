use std::path::PathBuf;

use thiserror::Error;

use crate::notebook::NotebookError;
use crate::report::ReportError;

#[derive(Error, Debug)]
pub enum ProfilingError {
    /// Profiler could not be started, exited non-zero, timed out, or wrote no report
    #[error("Profiler failed for {notebook}: {reason}")]
    ExternalProcessFailure { notebook: PathBuf, reason: String },
    #[error(transparent)]
    Report(#[from] ReportError),
    #[error(transparent)]
    Notebook(#[from] NotebookError),
    #[error("Annotation store unavailable: {0}")]
    Store(String),
}

impl ProfilingError {
    pub fn process_failure(notebook: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        ProfilingError::ExternalProcessFailure {
            notebook: notebook.into(),
            reason: reason.into(),
        }
    }

    pub fn is_malformed_report(&self) -> bool {
        matches!(self, ProfilingError::Report(ReportError::MalformedReport(_)))
    }
}
