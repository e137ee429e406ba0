use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use clap::{Parser, ValueEnum};
use serde::Serialize;
use tracing::{error, info, warn};

use notebook_profiler::annotations::{AnnotationActor, AnnotationRecord};
use notebook_profiler::config::{AppConfig, DEFAULT_CONFIG_PATH};
use notebook_profiler::logging::{cleanup_old_logs, init_dual_logging, init_simple_logging};
use notebook_profiler::notebook::{load_notebook, DocumentId, NotebookCell, NotebookError};
use notebook_profiler::profiler::ProcessProfiler;
use notebook_profiler::session::{EditorHost, ProfilingSession, RunSummary};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Annotate a Jupyter notebook's cells with line-profiler timings and performance categories
#[derive(Debug, Parser)]
#[command(name = "notebook_profiler", version)]
struct Opts {
    /// Notebook (.ipynb) to profile
    notebook: PathBuf,

    /// Configuration file
    #[clap(short = 'c', long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Use an existing report instead of running the profiler
    #[clap(short = 'r', long)]
    report: Option<PathBuf>,

    #[clap(short = 'f', long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Print the hover text at CELL:LINE (0-based) after annotating
    #[clap(long, value_parser = parse_hover_position)]
    hover: Option<(usize, usize)>,
}

fn parse_hover_position(value: &str) -> Result<(usize, usize), String> {
    let (cell, line) = value
        .split_once(':')
        .ok_or_else(|| format!("Expected CELL:LINE, got '{}'", value))?;
    let cell = cell.trim().parse().map_err(|e| format!("Invalid cell '{}': {}", cell, e))?;
    let line = line.trim().parse().map_err(|e| format!("Invalid line '{}': {}", line, e))?;
    Ok((cell, line))
}

/// Terminal stand-in for the editor: every cell is visible and decorations are collected
#[derive(Default)]
struct TerminalHost {
    cells: Mutex<Vec<NotebookCell>>,
    decorations: Mutex<BTreeMap<DocumentId, Vec<AnnotationRecord>>>,
}

impl TerminalHost {
    fn cells(&self) -> Vec<NotebookCell> {
        self.cells.lock().map(|cells| cells.clone()).unwrap_or_default()
    }

    fn decorations(&self) -> BTreeMap<DocumentId, Vec<AnnotationRecord>> {
        self.decorations.lock().map(|d| d.clone()).unwrap_or_default()
    }
}

impl EditorHost for TerminalHost {
    fn notebook_cells(&self, notebook: &Path) -> Result<Vec<NotebookCell>, NotebookError> {
        let cells = load_notebook(notebook)?;
        if let Ok(mut cached) = self.cells.lock() {
            *cached = cells.clone();
        }
        Ok(cells)
    }

    fn visible_documents(&self) -> Vec<DocumentId> {
        self.cells().into_iter().map(|cell| cell.document).collect()
    }

    fn apply_decorations(&self, document: &DocumentId, records: &[AnnotationRecord]) {
        if let Ok(mut decorations) = self.decorations.lock() {
            decorations.insert(document.clone(), records.to_vec());
        }
    }

    fn register_hover_provider(&self) {}

    fn notify_info(&self, message: &str) {
        info!("{}", message);
    }

    fn notify_error(&self, message: &str) {
        eprintln!("❌ {}", message);
    }
}

#[derive(Serialize)]
struct JsonDocument<'a> {
    cell_index: usize,
    annotations: &'a [AnnotationRecord],
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    summary: &'a RunSummary,
    documents: Vec<JsonDocument<'a>>,
}

fn render_json(
    summary: &RunSummary,
    decorations: &BTreeMap<DocumentId, Vec<AnnotationRecord>>,
) -> Result<String, serde_json::Error> {
    let output = JsonOutput {
        summary,
        documents: decorations
            .iter()
            .map(|(document, annotations)| JsonDocument {
                cell_index: document.cell_index,
                annotations,
            })
            .collect(),
    };
    serde_json::to_string_pretty(&output)
}

/// Source listing with each annotation appended to the line it is anchored on
fn render_text(
    summary: &RunSummary,
    cells: &[NotebookCell],
    decorations: &BTreeMap<DocumentId, Vec<AnnotationRecord>>,
) -> String {
    let mut out = String::new();
    for cell in cells {
        let (Some(records), Some(source)) = (decorations.get(&cell.document), cell.source.as_deref()) else {
            continue;
        };
        out.push_str(&format!("── cell {} ──\n", cell.document.cell_index));
        for (index, line) in source.split('\n').enumerate() {
            let notes: Vec<String> = records
                .iter()
                .filter(|record| record.line == index)
                .map(|record| format!("{} [{}]", record.text.trim_start(), record.color))
                .collect();
            if notes.is_empty() {
                out.push_str(&format!("{:>4} | {}\n", index + 1, line));
            } else {
                out.push_str(&format!("{:>4} | {}    # {}\n", index + 1, line, notes.join("  ")));
            }
        }
        out.push('\n');
    }

    out.push_str(&format!(
        "{} cells annotated, {} line annotations ({} cells and {} lines skipped)\n",
        summary.documents, summary.line_records, summary.cells_skipped, summary.lines_skipped
    ));
    for (category, count) in &summary.category_counts {
        if *count > 0 {
            out.push_str(&format!("  {:<22} {}\n", category.label(), count));
        }
    }
    if let Some(profiler_summary) = &summary.profiler_summary {
        if let Some(seconds) = profiler_summary.total_execution_time_seconds {
            out.push_str(&format!("  total execution time   {:.3} s\n", seconds));
        }
        if let Some(memory) = profiler_summary.memory_used_mb {
            out.push_str(&format!("  memory used            {:.2} MB\n", memory));
        }
    }
    out.push_str(&format!(
        "  completed at           {}\n",
        summary.completed_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    out
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let opts = Opts::parse();

    let config = match AppConfig::from_toml(&opts.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("⚠️ Failed to load {}: {}. Using default configuration", opts.config.display(), e);
            AppConfig::default()
        }
    };

    let _logging_guard = match init_dual_logging(config.logging_config.clone()) {
        Ok(guard) => Some(guard),
        Err(e) => {
            init_simple_logging(&config.logging_config.level_filter);
            error!("⚠️ Using fallback console-only logging due to error: {}", e);
            None
        }
    };

    if let Err(e) = cleanup_old_logs(&config.logging_config.log_dir, config.log_cleanup_days) {
        warn!("⚠️ Failed to clean up old log files: {}", e);
    }

    info!(
        notebook = %opts.notebook.display(),
        profiler_command = %config.profiler.command,
        report = ?opts.report,
        "🔧 Configuration loaded"
    );

    let store = kameo::spawn(AnnotationActor::new());
    let mut session = ProfilingSession::new(
        ProcessProfiler::new(config.profiler.clone()),
        TerminalHost::default(),
        store,
    );
    session.initialize();

    let summary = match &opts.report {
        Some(report) => session.annotate_from_report(&opts.notebook, report).await?,
        None => session.on_profiling_requested(&opts.notebook).await?,
    };

    let decorations = session.host().decorations();
    let rendered = match opts.format {
        OutputFormat::Json => render_json(&summary, &decorations)?,
        OutputFormat::Text => render_text(&summary, &session.host().cells(), &decorations),
    };
    println!("{}", rendered);

    if let Some((cell, line)) = opts.hover {
        let document = DocumentId::new(&opts.notebook, cell);
        match session.on_hover_query(&document, line).await {
            Some(text) => println!("hover {}:{} → {}", cell, line, text.trim_start()),
            None => println!("hover {}:{} → (no annotation)", cell, line),
        }
    }

    session.shutdown().await?;
    Ok(())
}
