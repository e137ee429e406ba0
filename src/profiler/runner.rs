//! External line-profiler invocation
//!
//! The profiler is run with the notebook path as its last argument and is
//! expected to write its report next to the notebook, at the path obtained by
//! replacing the `.ipynb` extension with the configured suffix. On failure the
//! profiler script writes a sibling error report instead.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};

use serde::Deserialize;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::config::ProfilerConfig;
use super::errors::ProfilingError;

/// Longest stdout/stderr excerpt kept for logs and failure messages
const OUTPUT_TAIL_CHARS: usize = 2000;

/// Produces a profile report for a notebook and returns where it was written
pub trait ExternalProfiler {
    fn profile(&self, notebook: &Path) -> impl Future<Output = Result<PathBuf, ProfilingError>> + Send;
}

/// Failure document the profiler script writes instead of a report
#[derive(Debug, Default, Deserialize)]
struct ErrorReport {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    traceback: Option<String>,
}

/// Sibling path of `notebook` with its `.ipynb` extension replaced by `suffix`
pub fn sibling_path(notebook: &Path, suffix: &str) -> PathBuf {
    let is_notebook = notebook
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("ipynb"))
        .unwrap_or(false);
    let base = if is_notebook {
        notebook.file_stem()
    } else {
        notebook.file_name()
    };
    let base = base.map(|name| name.to_string_lossy().into_owned()).unwrap_or_default();
    notebook.with_file_name(format!("{}{}", base, suffix))
}

fn tail(text: &str, max_chars: usize) -> &str {
    let trimmed = text.trim();
    let skip = trimmed.chars().count().saturating_sub(max_chars);
    match trimmed.char_indices().nth(skip) {
        Some((index, _)) => &trimmed[index..],
        None => trimmed,
    }
}

/// Runs the profiler as a child process
#[derive(Debug, Clone)]
pub struct ProcessProfiler {
    config: ProfilerConfig,
}

impl ProcessProfiler {
    pub fn new(config: ProfilerConfig) -> Self {
        Self { config }
    }

    pub fn report_path(&self, notebook: &Path) -> PathBuf {
        sibling_path(notebook, &self.config.output_suffix)
    }

    pub fn error_report_path(&self, notebook: &Path) -> PathBuf {
        sibling_path(notebook, &self.config.error_suffix)
    }

    /// Remove outputs of an earlier run so a silent failure cannot pass off stale data
    async fn remove_stale_outputs(&self, notebook: &Path) {
        for path in [self.report_path(notebook), self.error_report_path(notebook)] {
            match tokio::fs::remove_file(&path).await {
                Ok(()) => debug!(path = %path.display(), "Removed stale profiler output"),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => warn!(path = %path.display(), error = %e, "Could not remove stale profiler output"),
            }
        }
    }

    /// Error message from the failure document, if the profiler wrote one
    async fn read_error_report(&self, notebook: &Path) -> Option<String> {
        let path = self.error_report_path(notebook);
        let bytes = tokio::fs::read(&path).await.ok()?;
        let report: ErrorReport = serde_json::from_slice(&bytes).ok()?;
        if let Some(traceback) = &report.traceback {
            debug!(traceback = %traceback, "Profiler traceback");
        }
        report.error
    }

    async fn run(&self, notebook: &Path) -> Result<PathBuf, ProfilingError> {
        self.remove_stale_outputs(notebook).await;

        let mut command = Command::new(&self.config.command);
        command
            .args(&self.config.args)
            .arg(notebook)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        info!(
            command = %self.config.command,
            notebook = %notebook.display(),
            timeout_seconds = self.config.timeout_seconds,
            "🔍 Starting external profiler"
        );
        let started = Instant::now();

        let limit = Duration::from_secs(self.config.timeout_seconds);
        let output = match timeout(limit, command.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                return Err(ProfilingError::process_failure(
                    notebook,
                    format!("failed to start '{}': {}", self.config.command, e),
                ))
            }
            Err(_) => {
                return Err(ProfilingError::process_failure(
                    notebook,
                    format!("timed out after {}s", self.config.timeout_seconds),
                ))
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout);
        if !stdout.trim().is_empty() {
            debug!(stdout = %tail(&stdout, OUTPUT_TAIL_CHARS), "Profiler output");
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let reason = match self.read_error_report(notebook).await {
                Some(error) => format!("{} ({})", error, output.status),
                None => format!("{}: {}", output.status, tail(&stderr, OUTPUT_TAIL_CHARS)),
            };
            return Err(ProfilingError::process_failure(notebook, reason));
        }

        let report_path = self.report_path(notebook);
        if !tokio::fs::try_exists(&report_path).await.unwrap_or(false) {
            let reason = match self.read_error_report(notebook).await {
                Some(error) => error,
                None => format!("no report written at {}", report_path.display()),
            };
            return Err(ProfilingError::process_failure(notebook, reason));
        }

        info!(
            report = %report_path.display(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "✅ Profiler finished"
        );
        Ok(report_path)
    }
}

impl ExternalProfiler for ProcessProfiler {
    fn profile(&self, notebook: &Path) -> impl Future<Output = Result<PathBuf, ProfilingError>> + Send {
        self.run(notebook)
    }
}
