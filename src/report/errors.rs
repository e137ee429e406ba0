use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Malformed profile report: {0}")]
    MalformedReport(#[from] serde_json::Error),
    #[error("Failed to read profile report {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
