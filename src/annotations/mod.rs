pub mod actor;
pub mod builder;
pub mod messages;
pub mod storage;
pub mod structs;


pub use actor::AnnotationActor;
pub use builder::{annotate_cell, build_annotations};
pub use messages::{AnnotationActorMessage, AnnotationActorResponse};
pub use storage::AnnotationStore;
pub use structs::{AnnotationKind, AnnotationRecord, AnnotationSet, BuildStats};
