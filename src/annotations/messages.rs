use std::collections::BTreeMap;

use kameo::Reply;

use crate::notebook::DocumentId;
use super::structs::AnnotationRecord;

#[derive(Debug, Clone)]
pub enum AnnotationActorMessage {
    /// Clear the store and insert a freshly built set
    ReplaceAll {
        documents: BTreeMap<DocumentId, Vec<AnnotationRecord>>,
    },
    /// Remove every document's annotations
    Clear,
    /// Records for one document
    GetDocument {
        document: DocumentId,
    },
    /// Hover text anchored on a 0-based line
    Hover {
        document: DocumentId,
        line: usize,
    },
    /// Documents that currently carry annotations
    ListDocuments,
    /// Ordered copy of the whole store
    Snapshot,
    GetStoreStats,
}

#[derive(Debug, Clone, Reply)]
pub enum AnnotationActorResponse {
    Success,
    Records(Option<Vec<AnnotationRecord>>),
    HoverText(Option<String>),
    Documents(Vec<DocumentId>),
    Snapshot(BTreeMap<DocumentId, Vec<AnnotationRecord>>),
    StoreStats {
        documents: usize,
        records: usize,
    },
}
