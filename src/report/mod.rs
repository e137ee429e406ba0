pub mod errors;
pub mod parser;
pub mod structs;

pub use errors::ReportError;
pub use parser::{load_report, parse_report};
pub use structs::{CellStats, LineStats, ProfileReport, ReportMetadata, ReportSummary};
