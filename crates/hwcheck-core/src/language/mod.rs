//! Language profiles and command templates

pub mod command;
pub mod profile;

pub use command::{Arg, CommandContext, CommandTemplate};
pub use profile::{
    LanguageProfile, LanguageTable, BUILTIN_PROFILES, COMPILED_EXECUTABLE_NAME, CPP, JAVA, PYTHON,
};
