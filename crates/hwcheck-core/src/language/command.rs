//! Command templates resolved against a concrete project

use std::path::{Path, PathBuf};

/// One fragment of a command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arg {
    /// Passed through unchanged
    Literal(&'static str),
    /// Path of the entry-point file
    EntryFile,
    /// Entry-point basename without extension (Java class name)
    EntryClass,
    /// Directory containing the entry-point file
    EntryDir,
    /// Every relevant source file, expanded in place
    SourceFiles,
    /// Path of the compiled executable
    BuildOutput,
}

/// Ordered list of argument fragments; the first resolved argument is the program
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandTemplate {
    args: &'static [Arg],
}

/// Values substituted into template slots
#[derive(Debug, Clone, Copy)]
pub struct CommandContext<'a> {
    /// Entry-point file path
    pub entry_file: &'a Path,
    /// Entry-point class/module name
    pub entry_class: &'a str,
    /// Directory of the entry point
    pub entry_dir: &'a Path,
    /// All relevant source files
    pub sources: &'a [PathBuf],
    /// Compiled executable path
    pub build_output: &'a Path,
}

impl CommandTemplate {
    /// Create a template from static fragments
    pub const fn new(args: &'static [Arg]) -> Self {
        Self { args }
    }

    /// Substitute every slot; pure, no I/O
    pub fn resolve(&self, ctx: &CommandContext<'_>) -> Vec<String> {
        let mut out = Vec::with_capacity(self.args.len() + ctx.sources.len());
        for arg in self.args {
            match arg {
                Arg::Literal(s) => out.push((*s).to_string()),
                Arg::EntryFile => out.push(ctx.entry_file.to_string_lossy().into_owned()),
                Arg::EntryClass => out.push(ctx.entry_class.to_string()),
                Arg::EntryDir => out.push(ctx.entry_dir.to_string_lossy().into_owned()),
                Arg::SourceFiles => out.extend(
                    ctx.sources
                        .iter()
                        .map(|p| p.to_string_lossy().into_owned()),
                ),
                Arg::BuildOutput => out.push(ctx.build_output.to_string_lossy().into_owned()),
            }
        }
        out
    }
}
