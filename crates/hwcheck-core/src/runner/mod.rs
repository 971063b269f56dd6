//! Compilation and execution of student programs

pub mod build;
pub mod executor;

pub use build::compile;
pub use executor::{outputs_match, TestExecutor};
