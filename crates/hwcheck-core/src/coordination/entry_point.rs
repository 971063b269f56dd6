//! Entry-point resolution
//!
//! A single candidate is taken as-is. With several candidates the model is
//! asked once, and its trimmed answer must be exactly one of the candidate
//! basenames. There is no fallback to the first candidate.

use crate::error::{Error, Result};
use crate::language::{CommandContext, LanguageProfile};
use crate::platform::PathUtil;
use crate::traits::{ResponseFormat, TextGenerator};
use std::path::{Path, PathBuf};

/// Prompt for choosing the entry point; `{files}` is one basename per line
pub const ENTRY_POINT_PROMPT: &str = "You are a code analysis expert. Given the following list of filenames from a student's project, identify the single most likely main entry-point file. Respond with ONLY the filename and nothing else.\nFILENAMES:\n{files}";

/// A language profile bound to a concrete entry point
#[derive(Debug, Clone)]
pub struct Project<'t> {
    /// Selected language
    pub profile: &'t LanguageProfile,
    /// Entry-point path, resolved against the repository root
    pub entry_file: PathBuf,
    /// Entry-point basename
    pub entry_basename: String,
    /// Basename without extension (Java class name)
    pub entry_class: String,
    /// Directory containing the entry point
    pub entry_dir: PathBuf,
    /// Every relevant changed source file, resolved against the repository root
    pub sources: Vec<PathBuf>,
}

impl<'t> Project<'t> {
    /// Build a project from the chosen repository-relative entry path
    pub fn new(
        profile: &'t LanguageProfile,
        repo_root: &Path,
        entry: &str,
        files: &[String],
    ) -> Self {
        let entry_file = PathUtil::in_repo(repo_root, entry);
        let entry_dir = PathUtil::parent_dir(&entry_file);
        Self {
            profile,
            entry_basename: PathUtil::basename(entry).to_string(),
            entry_class: PathUtil::stem(entry).to_string(),
            entry_file,
            entry_dir,
            sources: files
                .iter()
                .map(|f| PathUtil::in_repo(repo_root, f))
                .collect(),
        }
    }

    /// Slot values for command templates
    pub fn command_context<'a>(&'a self, build_output: &'a Path) -> CommandContext<'a> {
        CommandContext {
            entry_file: &self.entry_file,
            entry_class: &self.entry_class,
            entry_dir: &self.entry_dir,
            sources: &self.sources,
            build_output,
        }
    }
}

/// Render the entry-point prompt for the given basenames
pub fn entry_point_prompt(basenames: &[&str]) -> String {
    ENTRY_POINT_PROMPT.replace("{files}", &basenames.join("\n"))
}

/// Validate the model's answer against the candidates
///
/// Returns the index of the first candidate whose basename equals the
/// trimmed answer.
pub fn match_choice(answer: &str, candidates: &[String]) -> Result<usize> {
    let choice = answer.trim();
    if candidates.is_empty() {
        return Err(Error::EntryPoint("no candidate files to choose from".into()));
    }
    if choice.is_empty() {
        return Err(Error::EntryPoint(
            "AI returned an empty answer for the entry point".into(),
        ));
    }

    candidates
        .iter()
        .position(|c| PathUtil::basename(c) == choice)
        .ok_or_else(|| {
            let names: Vec<&str> = candidates.iter().map(|c| PathUtil::basename(c)).collect();
            Error::EntryPoint(format!(
                "AI chose '{}', which is not in the list of found files: [{}]",
                choice,
                names.join(", ")
            ))
        })
}

/// Pick the entry point among the changed files of the detected language
pub async fn resolve_entry_point<'t, G: TextGenerator>(
    profile: &'t LanguageProfile,
    files: &[String],
    repo_root: &Path,
    model: &G,
) -> Result<Project<'t>> {
    let index = match files {
        [] => {
            return Err(Error::EntryPoint(format!(
                "no {} files to choose an entry point from",
                profile.name
            )))
        }
        [single] => {
            tracing::info!(
                language = profile.name,
                entry = PathUtil::basename(single),
                "single source file, using it as the entry point"
            );
            0
        }
        _ => {
            let basenames: Vec<&str> = files.iter().map(|f| PathUtil::basename(f)).collect();
            tracing::info!(candidates = ?basenames, "multiple potential entry points, asking AI");

            let answer = model
                .generate(&entry_point_prompt(&basenames), ResponseFormat::Text)
                .await
                .map_err(|e| Error::EntryPoint(format!("AI failed to determine entry point: {}", e)))?;

            let index = match_choice(&answer, files)?;
            tracing::info!(entry = basenames[index], "AI selected the entry point");
            index
        }
    };

    Ok(Project::new(profile, repo_root, &files[index], files))
}
