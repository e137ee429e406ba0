use std::collections::BTreeMap;

use kameo::actor::{ActorRef, WeakActorRef};
use kameo::error::{ActorStopReason, BoxError};
use kameo::message::{Context, Message};
use kameo::{Actor, mailbox::unbounded::UnboundedMailbox};
use tracing::{debug, info};

use crate::notebook::DocumentId;
use super::messages::{AnnotationActorMessage, AnnotationActorResponse};
use super::storage::AnnotationStore;
use super::structs::AnnotationRecord;

/// Sole owner of the annotation store; every read and write goes through its mailbox
pub struct AnnotationActor {
    store: AnnotationStore,
}

impl AnnotationActor {
    pub fn new() -> Self {
        Self {
            store: AnnotationStore::new(),
        }
    }

    fn handle_replace_all(
        &mut self,
        documents: BTreeMap<DocumentId, Vec<AnnotationRecord>>,
    ) -> AnnotationActorResponse {
        let previous = self.store.len();
        let current = self.store.replace_all(documents);
        info!(previous, current, "🗂️ Annotation store replaced");
        AnnotationActorResponse::Success
    }

    fn handle_clear(&mut self) -> AnnotationActorResponse {
        let removed = self.store.len();
        self.store.clear();
        debug!(removed, "🧹 Annotation store cleared");
        AnnotationActorResponse::Success
    }

    fn handle_hover(&self, document: DocumentId, line: usize) -> AnnotationActorResponse {
        let text = self.store.hover(&document, line).map(str::to_string);
        debug!(document = %document, line, found = text.is_some(), "Hover lookup");
        AnnotationActorResponse::HoverText(text)
    }
}

impl Default for AnnotationActor {
    fn default() -> Self {
        Self::new()
    }
}

impl Actor for AnnotationActor {
    type Mailbox = UnboundedMailbox<Self>;

    async fn on_start(&mut self, _actor_ref: ActorRef<Self>) -> Result<(), BoxError> {
        info!("🎭 AnnotationActor started");
        Ok(())
    }

    async fn on_stop(&mut self, _actor_ref: WeakActorRef<Self>, _reason: ActorStopReason) -> Result<(), BoxError> {
        self.store.clear();
        info!("🎭 AnnotationActor stopped");
        Ok(())
    }
}

impl Message<AnnotationActorMessage> for AnnotationActor {
    type Reply = AnnotationActorResponse;

    async fn handle(
        &mut self,
        message: AnnotationActorMessage,
        _ctx: Context<'_, Self, Self::Reply>,
    ) -> Self::Reply {
        match message {
            AnnotationActorMessage::ReplaceAll { documents } => self.handle_replace_all(documents),
            AnnotationActorMessage::Clear => self.handle_clear(),
            AnnotationActorMessage::GetDocument { document } => {
                AnnotationActorResponse::Records(self.store.get(&document).map(<[AnnotationRecord]>::to_vec))
            }
            AnnotationActorMessage::Hover { document, line } => self.handle_hover(document, line),
            AnnotationActorMessage::ListDocuments => {
                AnnotationActorResponse::Documents(self.store.document_ids())
            }
            AnnotationActorMessage::Snapshot => AnnotationActorResponse::Snapshot(self.store.snapshot()),
            AnnotationActorMessage::GetStoreStats => AnnotationActorResponse::StoreStats {
                documents: self.store.len(),
                records: self.store.total_records(),
            },
        }
    }
}
