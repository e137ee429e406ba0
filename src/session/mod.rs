pub mod controller;
pub mod host;

pub use controller::{ProfilingSession, RunSummary};
pub use host::EditorHost;
