pub mod annotations;
pub mod classification;
pub mod config;
pub mod logging;
pub mod notebook;
pub mod profiler;
pub mod report;
pub mod session;
