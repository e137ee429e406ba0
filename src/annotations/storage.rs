use std::collections::BTreeMap;

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::notebook::DocumentId;
use super::structs::AnnotationRecord;

/// Document identity to its current annotation records
#[derive(Debug, Default)]
pub struct AnnotationStore {
    documents: FxHashMap<DocumentId, Vec<AnnotationRecord>>,
}

impl AnnotationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop everything, then insert the new set; callers never see a mix of runs
    pub fn replace_all<I>(&mut self, documents: I) -> usize
    where
        I: IntoIterator<Item = (DocumentId, Vec<AnnotationRecord>)>,
    {
        self.documents.clear();
        self.documents.extend(documents);
        debug!(documents = self.documents.len(), "Annotation store replaced");
        self.documents.len()
    }

    pub fn clear(&mut self) {
        self.documents.clear();
    }

    pub fn get(&self, document: &DocumentId) -> Option<&[AnnotationRecord]> {
        self.documents.get(document).map(Vec::as_slice)
    }

    /// Text of the first record anchored on `line`
    pub fn hover(&self, document: &DocumentId, line: usize) -> Option<&str> {
        self.get(document)?
            .iter()
            .find(|record| record.line == line)
            .map(|record| record.text.as_str())
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

    pub fn document_ids(&self) -> Vec<DocumentId> {
        let mut ids: Vec<DocumentId> = self.documents.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Ordered copy of the store contents
    pub fn snapshot(&self) -> BTreeMap<DocumentId, Vec<AnnotationRecord>> {
        self.documents
            .iter()
            .map(|(id, records)| (id.clone(), records.clone()))
            .collect()
    }
}
