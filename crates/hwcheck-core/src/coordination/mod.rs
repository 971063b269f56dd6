//! Grading pipeline stages and their coordinator

pub mod detector;
pub mod entry_point;
pub mod processor;
pub mod review;
pub mod test_gen;

pub use detector::{detect_language, Detection};
pub use entry_point::{resolve_entry_point, Project};
pub use processor::GradingProcessor;
