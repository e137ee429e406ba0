pub mod errors;
pub mod runner;

pub use errors::ProfilingError;
pub use runner::{sibling_path, ExternalProfiler, ProcessProfiler};
