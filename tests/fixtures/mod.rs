use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use notebook_profiler::annotations::AnnotationRecord;
use notebook_profiler::notebook::{load_notebook, DocumentId, NotebookCell, NotebookError};
use notebook_profiler::session::EditorHost;

/// Two code cells around a markdown cell; the first stores its source as a line list
pub const NOTEBOOK_JSON: &str = r##"{
  "cells": [
    {"cell_type": "code", "metadata": {}, "outputs": [], "execution_count": 1,
     "source": ["import time\n", "time.sleep(0.4)\n", "total = 0"]},
    {"cell_type": "markdown", "metadata": {}, "source": "# Notes"},
    {"cell_type": "code", "metadata": {}, "outputs": [], "execution_count": 2,
     "source": "for i in range(100000):\n    total += i"}
  ],
  "metadata": {"kernelspec": {"name": "python3"}},
  "nbformat": 4,
  "nbformat_minor": 5
}"##;

/// Report covering both code cells, in the array form
pub const FULL_REPORT_JSON: &str = r#"{
  "cells": [
    {"total_time": 4100000, "total_hits": 3, "percent_time": 85.0, "classification": "Performance-Critical",
     "lines": {
       "1": {"time": 100000, "percent": 2.4, "hits": 1, "code": "import time"},
       "2": {"time": 4000000, "percent": 97.5, "hits": 1, "code": "time.sleep(0.4)"}
     }},
    null,
    {"total_time": 600000, "total_hits": 100001, "percent_time": 15.0, "classification": "Loop-Intensive",
     "lines": {
       "1": {"time": 200000, "percent": 5.0, "hits": 100001},
       "2": {"time": 400000, "percent": 10.0, "hits": 100000},
       "5": {"time": 1, "percent": 0.0, "hits": 1}
     }}
  ],
  "metadata": {"notebook_path": "analysis.ipynb", "profile_timestamp": "2026-10-19T09:30:00"},
  "summary": {"total_execution_time_seconds": 0.47, "memory_used_mb": 1.5}
}"#;

/// Report covering only the first cell, in the keyed form
pub const PARTIAL_REPORT_JSON: &str = r#"{
  "cells": {
    "0": {"total_time": 10000, "total_hits": 3, "percent_time": 100.0,
          "lines": {"3": {"time": 10000, "percent": 100.0, "hits": 1}}}
  }
}"#;

/// Write the sample notebook into `dir` and return its path
pub fn write_notebook(dir: &Path) -> PathBuf {
    let path = dir.join("analysis.ipynb");
    std::fs::write(&path, NOTEBOOK_JSON).expect("Failed to write notebook fixture");
    path
}

/// Write `body` to `name` inside `dir` and return its path
pub fn write_report(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, body).expect("Failed to write report fixture");
    path
}

/// Editor host backed by the notebook file; every cell counts as visible
#[derive(Default)]
pub struct RecordingHost {
    visible: Mutex<Vec<DocumentId>>,
    pub decorations: Mutex<BTreeMap<DocumentId, Vec<AnnotationRecord>>>,
    pub infos: Mutex<Vec<String>>,
    pub errors: Mutex<Vec<String>>,
}

impl RecordingHost {
    pub fn decorated(&self, document: &DocumentId) -> Option<Vec<AnnotationRecord>> {
        self.decorations.lock().unwrap().get(document).cloned()
    }

    pub fn error_count(&self) -> usize {
        self.errors.lock().unwrap().len()
    }
}

impl EditorHost for RecordingHost {
    fn notebook_cells(&self, notebook: &Path) -> Result<Vec<NotebookCell>, NotebookError> {
        let cells = load_notebook(notebook)?;
        *self.visible.lock().unwrap() = cells.iter().map(|cell| cell.document.clone()).collect();
        Ok(cells)
    }

    fn visible_documents(&self) -> Vec<DocumentId> {
        self.visible.lock().unwrap().clone()
    }

    fn apply_decorations(&self, document: &DocumentId, records: &[AnnotationRecord]) {
        self.decorations.lock().unwrap().insert(document.clone(), records.to_vec());
    }

    fn register_hover_provider(&self) {}

    fn notify_info(&self, message: &str) {
        self.infos.lock().unwrap().push(message.to_string());
    }

    fn notify_error(&self, message: &str) {
        self.errors.lock().unwrap().push(message.to_string());
    }
}
