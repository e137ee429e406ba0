//! Entry points the host editor calls into
//!
//! A session owns references to its collaborators: the external profiler, the
//! editor host, and the annotation store actor. A run builds the complete
//! annotation set before committing it with a single `ReplaceAll`, so a failed
//! run leaves the previous annotations in place.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use kameo::actor::ActorRef;
use kameo::request::MessageSend;
use serde::Serialize;
use tracing::{error, info, warn};

use crate::annotations::{
    build_annotations, AnnotationActor, AnnotationActorMessage, AnnotationActorResponse, AnnotationRecord,
    AnnotationSet,
};
use crate::classification::Category;
use crate::notebook::DocumentId;
use crate::profiler::{ExternalProfiler, ProfilingError};
use crate::report::{parse_report, ReportError, ReportSummary};
use super::host::EditorHost;

/// Outcome of one successful profiling run
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub notebook: PathBuf,
    pub report_path: PathBuf,
    pub documents: usize,
    pub line_records: usize,
    pub cells_skipped: usize,
    pub lines_skipped: usize,
    pub category_counts: Vec<(Category, usize)>,
    pub profiler_summary: Option<ReportSummary>,
    pub completed_at: DateTime<Utc>,
}

impl RunSummary {
    fn new(notebook: &Path, report_path: &Path, set: &AnnotationSet, profiler_summary: Option<ReportSummary>) -> Self {
        Self {
            notebook: notebook.to_path_buf(),
            report_path: report_path.to_path_buf(),
            documents: set.len(),
            line_records: set.stats.line_records,
            cells_skipped: set.stats.cells_skipped,
            lines_skipped: set.stats.lines_skipped,
            category_counts: set.category_counts(),
            profiler_summary,
            completed_at: Utc::now(),
        }
    }
}

pub struct ProfilingSession<P, H> {
    profiler: P,
    host: H,
    store: ActorRef<AnnotationActor>,
    hover_registered: bool,
}

impl<P: ExternalProfiler, H: EditorHost> ProfilingSession<P, H> {
    pub fn new(profiler: P, host: H, store: ActorRef<AnnotationActor>) -> Self {
        Self {
            profiler,
            host,
            store,
            hover_registered: false,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Register the hover provider with the host; repeated calls are no-ops
    pub fn initialize(&mut self) {
        if self.hover_registered {
            return;
        }
        self.host.register_hover_provider();
        self.hover_registered = true;
        info!("🖱️ Hover provider registered");
    }

    async fn ask_store(&self, message: AnnotationActorMessage) -> Result<AnnotationActorResponse, ProfilingError> {
        self.store
            .ask(message)
            .send()
            .await
            .map_err(|e| ProfilingError::Store(format!("Failed to communicate with AnnotationActor: {}", e)))
    }

    /// Run the external profiler on `notebook` and annotate its cells
    pub async fn on_profiling_requested(&self, notebook: &Path) -> Result<RunSummary, ProfilingError> {
        let result = async {
            let report_path = self.profiler.profile(notebook).await?;
            self.annotate_from_report(notebook, &report_path).await
        }
        .await;

        match &result {
            Ok(summary) => {
                self.host.notify_info(&format!(
                    "Profiling complete: {} cells annotated",
                    summary.documents
                ));
            }
            Err(e) => {
                error!(notebook = %notebook.display(), error = %e, "❌ Profiling run failed");
                self.host.notify_error(&format!("Profiling failed: {}", e));
            }
        }
        result
    }

    /// Annotate `notebook` from an existing report without running the profiler
    pub async fn annotate_from_report(&self, notebook: &Path, report_path: &Path) -> Result<RunSummary, ProfilingError> {
        let cells = self.host.notebook_cells(notebook)?;

        let bytes = tokio::fs::read(report_path).await.map_err(|source| ReportError::Io {
            path: report_path.to_path_buf(),
            source,
        })?;
        let report = parse_report(&bytes)?;

        let set = build_annotations(&cells, &report);
        let summary = RunSummary::new(notebook, report_path, &set, report.summary.clone());

        match self.ask_store(AnnotationActorMessage::ReplaceAll { documents: set.into_documents() }).await? {
            AnnotationActorResponse::Success => {}
            other => return Err(ProfilingError::Store(format!("Unexpected response to ReplaceAll: {:?}", other))),
        }

        // the new set is committed; a failed reapply only leaves stale decorations
        let visible = self.host.visible_documents();
        if let Err(e) = self.on_visible_editors_changed(&visible).await {
            warn!(notebook = %notebook.display(), error = %e, "⚠️ Failed to reapply decorations");
        }

        info!(
            notebook = %notebook.display(),
            documents = summary.documents,
            line_records = summary.line_records,
            "📊 Notebook annotated"
        );
        Ok(summary)
    }

    /// Hover text anchored on `line` of `document`, if any
    pub async fn on_hover_query(&self, document: &DocumentId, line: usize) -> Option<String> {
        let message = AnnotationActorMessage::Hover {
            document: document.clone(),
            line,
        };
        match self.ask_store(message).await {
            Ok(AnnotationActorResponse::HoverText(text)) => text,
            Ok(other) => {
                warn!("Unexpected response to Hover: {:?}", other);
                None
            }
            Err(e) => {
                warn!(error = %e, "Hover lookup failed");
                None
            }
        }
    }

    /// Records currently stored for `document`
    pub async fn annotations_for(&self, document: &DocumentId) -> Result<Option<Vec<AnnotationRecord>>, ProfilingError> {
        match self
            .ask_store(AnnotationActorMessage::GetDocument { document: document.clone() })
            .await?
        {
            AnnotationActorResponse::Records(records) => Ok(records),
            other => Err(ProfilingError::Store(format!("Unexpected response to GetDocument: {:?}", other))),
        }
    }

    /// Reapply stored annotations to the given editors; returns how many were decorated
    pub async fn on_visible_editors_changed(&self, documents: &[DocumentId]) -> Result<usize, ProfilingError> {
        let mut applied = 0;
        for document in documents {
            if let Some(records) = self.annotations_for(document).await? {
                self.host.apply_decorations(document, &records);
                applied += 1;
            }
        }
        Ok(applied)
    }

    /// Drop all annotations at teardown
    pub async fn shutdown(&self) -> Result<(), ProfilingError> {
        self.ask_store(AnnotationActorMessage::Clear).await?;
        info!("👋 Profiling session closed");
        Ok(())
    }
}
