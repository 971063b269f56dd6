//! Language profiles and the extension lookup table

use super::command::{Arg, CommandTemplate};
use crate::error::{Error, Result};
use crate::platform::PathUtil;
use globset::{Glob, GlobSet, GlobSetBuilder};

/// Name of the executable produced by compiled profiles
pub const COMPILED_EXECUTABLE_NAME: &str = "student_executable";

/// How to recognize, optionally compile, and run programs of one language
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanguageProfile {
    /// Display name
    pub name: &'static str,
    /// Basename glob, e.g. `*.py`
    pub glob: &'static str,
    /// Compile invocation, `None` for interpreted languages
    pub compile: Option<CommandTemplate>,
    /// Run invocation
    pub run: CommandTemplate,
}

impl LanguageProfile {
    /// Whether a build step is required before running
    #[inline]
    pub const fn needs_compile(&self) -> bool {
        self.compile.is_some()
    }
}

/// Python: interpreter only
pub const PYTHON: LanguageProfile = LanguageProfile {
    name: "Python",
    glob: "*.py",
    compile: None,
    run: CommandTemplate::new(&[Arg::Literal("python3"), Arg::EntryFile]),
};

/// Java: compile every changed source, run the entry class
pub const JAVA: LanguageProfile = LanguageProfile {
    name: "Java",
    glob: "*.java",
    compile: Some(CommandTemplate::new(&[Arg::Literal("javac"), Arg::SourceFiles])),
    run: CommandTemplate::new(&[
        Arg::Literal("java"),
        Arg::Literal("-cp"),
        Arg::EntryDir,
        Arg::EntryClass,
    ]),
};

/// C++: compile every changed source into one executable
pub const CPP: LanguageProfile = LanguageProfile {
    name: "C++",
    glob: "*.cpp",
    compile: Some(CommandTemplate::new(&[
        Arg::Literal("g++"),
        Arg::SourceFiles,
        Arg::Literal("-o"),
        Arg::BuildOutput,
        Arg::Literal("-std=c++17"),
    ])),
    run: CommandTemplate::new(&[Arg::BuildOutput]),
};

/// Built-in profiles, in lookup order
pub const BUILTIN_PROFILES: &[LanguageProfile] = &[PYTHON, JAVA, CPP];

/// Immutable extension -> profile lookup, built once at startup
#[derive(Debug, Clone)]
pub struct LanguageTable {
    profiles: Vec<LanguageProfile>,
    globs: GlobSet,
}

impl LanguageTable {
    /// Compile the globs of the given profiles
    pub fn new(profiles: &[LanguageProfile]) -> Result<Self> {
        if profiles.is_empty() {
            return Err(Error::Config("language table needs at least one profile".into()));
        }

        let mut builder = GlobSetBuilder::new();
        for profile in profiles {
            builder.add(Glob::new(profile.glob)?);
        }

        Ok(Self {
            profiles: profiles.to_vec(),
            globs: builder.build()?,
        })
    }

    /// Table of the built-in Python / Java / C++ profiles
    pub fn builtin() -> Result<Self> {
        Self::new(BUILTIN_PROFILES)
    }

    /// All profiles in lookup order
    #[inline]
    pub fn profiles(&self) -> &[LanguageProfile] {
        &self.profiles
    }

    /// Index of the first profile whose glob matches the file's basename
    pub fn index_for(&self, path: &str) -> Option<usize> {
        self.globs
            .matches(PathUtil::basename(path))
            .into_iter()
            .min()
    }

    /// Profile for a path, if any
    #[inline]
    pub fn profile_for(&self, path: &str) -> Option<&LanguageProfile> {
        self.index_for(path).map(|i| &self.profiles[i])
    }

    /// Comma-separated list of supported globs, for log messages
    pub fn describe(&self) -> String {
        self.profiles
            .iter()
            .map(|p| p.glob.trim_start_matches('*'))
            .collect::<Vec<_>>()
            .join(", ")
    }
}
