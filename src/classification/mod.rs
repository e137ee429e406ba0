pub mod category;
pub mod classifier;
pub mod time_format;

// Re-export commonly used types for convenience
pub use category::{AnnotationColor, Category};
pub use classifier::{classify, ClassifierInput};
pub use time_format::{format_duration, format_percent};
