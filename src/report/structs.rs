use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::classification::Category;

/// Per-line statistics as written by the line profiler
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineStats {
    #[serde(default)]
    pub time: Option<f64>,
    #[serde(default)]
    pub percent: Option<f64>,
    #[serde(default, alias = "total_hits")]
    pub hits: Option<u64>,
    #[serde(default)]
    pub time_per_hit: Option<f64>,
    #[serde(default)]
    pub memory_delta_mb: Option<f64>,
    /// Stripped source text of the profiled line
    #[serde(default)]
    pub code: Option<String>,
}

/// Aggregate statistics for one notebook cell
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CellStats {
    #[serde(default)]
    pub total_time: Option<f64>,
    #[serde(default)]
    pub total_hits: Option<u64>,
    #[serde(default)]
    pub percent_time: Option<f64>,
    #[serde(default)]
    pub memory_delta_mb: Option<f64>,
    /// Category label computed by the profiler itself, kept for reference only
    #[serde(default)]
    pub classification: Option<String>,
    /// 1-based line number (string encoded) to line statistics, in report order
    #[serde(default, deserialize_with = "deserialize_lines")]
    pub lines: IndexMap<String, Option<LineStats>>,
}

/// Line entries are decoded one at a time; an entry that does not look like
/// line statistics becomes `None` instead of failing the whole cell
fn deserialize_lines<'de, D>(deserializer: D) -> Result<IndexMap<String, Option<LineStats>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = IndexMap::<String, Value>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|(key, value)| {
            let stats = match serde_json::from_value::<Option<LineStats>>(value) {
                Ok(stats) => stats,
                Err(e) => {
                    debug!(line = %key, error = %e, "Undecodable line entry");
                    None
                }
            };
            (key, stats)
        })
        .collect())
}

impl CellStats {
    /// Category the profiler attached to this cell, if any
    pub fn profiler_category(&self) -> Option<Category> {
        self.classification.as_deref().map(Category::from_label)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportMetadata {
    #[serde(default)]
    pub notebook_path: Option<String>,
    #[serde(default)]
    pub profile_timestamp: Option<String>,
    #[serde(default)]
    pub function_name: Option<String>,
}

/// Whole-run measurements taken around the profiled execution
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    #[serde(default)]
    pub total_execution_time_seconds: Option<f64>,
    #[serde(default)]
    pub memory_used_mb: Option<f64>,
    #[serde(default)]
    pub cpu_usage_percent: Option<f64>,
}

/// Decoded profiler report; `cells[&i]` belongs to notebook cell position `i`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileReport {
    /// Usable cell statistics by notebook cell position; absent positions have no entry
    pub cells: BTreeMap<usize, CellStats>,
    /// Number of positions the report spans, including absent ones
    pub positions: usize,
    pub metadata: Option<ReportMetadata>,
    pub summary: Option<ReportSummary>,
}

impl ProfileReport {
    /// Statistics for the cell at `index`, if the report has an entry for it
    pub fn cell(&self, index: usize) -> Option<&CellStats> {
        self.cells.get(&index)
    }

    pub fn len(&self) -> usize {
        self.positions
    }

    pub fn is_empty(&self) -> bool {
        self.positions == 0
    }

    /// Number of positions that carry usable cell statistics
    pub fn present_cells(&self) -> usize {
        self.cells.len()
    }
}
