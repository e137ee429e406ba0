use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::classification::{AnnotationColor, Category};
use crate::notebook::DocumentId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnotationKind {
    Line,
    CellSummary,
}

/// One position-anchored annotation; `column` is the length of the anchored
/// line in UTF-16 code units so the marker sits at end of line in the editor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationRecord {
    pub line: usize,
    pub column: usize,
    pub text: String,
    pub color: AnnotationColor,
    pub category: Category,
    pub kind: AnnotationKind,
}

/// Counters for what the builder processed and what it skipped
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BuildStats {
    pub cells_seen: usize,
    pub cells_annotated: usize,
    pub cells_skipped: usize,
    pub line_records: usize,
    pub lines_skipped: usize,
}

/// Output of one build: records grouped per document, in emission order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnnotationSet {
    pub documents: BTreeMap<DocumentId, Vec<AnnotationRecord>>,
    pub stats: BuildStats,
}

impl AnnotationSet {
    pub fn get(&self, document: &DocumentId) -> Option<&[AnnotationRecord]> {
        self.documents.get(document).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn total_records(&self) -> usize {
        self.documents.values().map(Vec::len).sum()
    }

    /// Cell-level category tally, in `Category::ALL` order
    pub fn category_counts(&self) -> Vec<(Category, usize)> {
        let summaries: Vec<Category> = self
            .documents
            .values()
            .flat_map(|records| records.iter())
            .filter(|record| record.kind == AnnotationKind::CellSummary)
            .map(|record| record.category)
            .collect();

        Category::ALL
            .into_iter()
            .map(|category| (category, summaries.iter().filter(|c| **c == category).count()))
            .collect()
    }

    pub fn into_documents(self) -> BTreeMap<DocumentId, Vec<AnnotationRecord>> {
        self.documents
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(category: Category, kind: AnnotationKind) -> AnnotationRecord {
        AnnotationRecord {
            line: 0,
            column: 0,
            text: String::new(),
            color: category.color(),
            category,
            kind,
        }
    }

    #[test]
    fn test_category_counts_only_tally_cell_summaries() {
        let mut set = AnnotationSet::default();
        set.documents.insert(
            DocumentId::new("nb.ipynb", 0),
            vec![
                record(Category::CpuIntensive, AnnotationKind::Line),
                record(Category::PerformanceCritical, AnnotationKind::CellSummary),
            ],
        );
        set.documents.insert(
            DocumentId::new("nb.ipynb", 3),
            vec![record(Category::PerformanceCritical, AnnotationKind::CellSummary)],
        );

        let counts = set.category_counts();
        assert_eq!(counts.len(), Category::ALL.len());
        assert_eq!(counts[0], (Category::PerformanceCritical, 2));
        assert_eq!(counts[1], (Category::CpuIntensive, 0));
        assert_eq!(set.total_records(), 3);
        assert_eq!(set.len(), 2);
    }
}
