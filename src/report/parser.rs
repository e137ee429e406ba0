//! Profile report decoding
//!
//! The report is decoded once here. Structural problems with the document as
//! a whole (not JSON, no `cells` collection) fail the parse; a single cell that
//! does not look like cell statistics is recorded as absent so the rest of the
//! report stays usable.

use std::collections::BTreeMap;
use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::errors::ReportError;
use super::structs::{CellStats, ProfileReport, ReportMetadata, ReportSummary};

/// `cells` is written either as an array by position or as an object keyed by
/// the stringified notebook cell index
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawCells {
    Sequence(Vec<Value>),
    Keyed(IndexMap<String, Value>),
}

#[derive(Debug, Deserialize)]
struct RawReport {
    cells: RawCells,
    #[serde(default)]
    metadata: Option<ReportMetadata>,
    #[serde(default)]
    summary: Option<ReportSummary>,
}

fn decode_cell(position: usize, value: Value) -> Option<CellStats> {
    if value.is_null() {
        return None;
    }
    match serde_json::from_value::<CellStats>(value) {
        Ok(cell) => Some(cell),
        Err(e) => {
            debug!(cell = position, error = %e, "Skipping undecodable cell entry");
            None
        }
    }
}

/// Decode raw report bytes into typed per-cell statistics
pub fn parse_report(bytes: &[u8]) -> Result<ProfileReport, ReportError> {
    let raw: RawReport = serde_json::from_slice(bytes)?;

    let mut cells = BTreeMap::new();
    let positions = match raw.cells {
        RawCells::Sequence(values) => {
            let positions = values.len();
            for (position, value) in values.into_iter().enumerate() {
                if let Some(cell) = decode_cell(position, value) {
                    cells.insert(position, cell);
                }
            }
            positions
        }
        RawCells::Keyed(entries) => {
            let mut positions = 0;
            for (key, value) in entries {
                let Ok(position) = key.trim().parse::<usize>() else {
                    warn!(key = %key, "Ignoring report cell with non-numeric key");
                    continue;
                };
                positions = positions.max(position.saturating_add(1));
                if let Some(cell) = decode_cell(position, value) {
                    cells.insert(position, cell);
                }
            }
            positions
        }
    };

    let report = ProfileReport {
        cells,
        positions,
        metadata: raw.metadata,
        summary: raw.summary,
    };
    debug!(
        positions = report.len(),
        present = report.present_cells(),
        "Decoded profile report"
    );
    Ok(report)
}

/// Read and decode a report file
pub fn load_report(path: &Path) -> Result<ProfileReport, ReportError> {
    let bytes = std::fs::read(path).map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_report(&bytes)
}
