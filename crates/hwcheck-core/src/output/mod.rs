//! Report rendering and CI output files

pub mod annotations;
pub mod report;
pub mod writer;

pub use annotations::{error_annotation, escape_workflow_data, warning_annotation};
pub use writer::OutputWriter;
