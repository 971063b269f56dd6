//! Language detection over the changed-file list

use crate::error::{Error, Result};
use crate::language::{LanguageProfile, LanguageTable};
use crate::types::CommitFile;

/// Outcome of language detection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Detection<'t> {
    /// No added/modified file matches any profile
    Nothing,
    /// Exactly one language changed
    Detected {
        /// The matched profile
        profile: &'t LanguageProfile,
        /// Repository-relative paths of the matching files, API order
        files: Vec<String>,
    },
}

/// Select the single language of a push
///
/// Only added/modified files are considered. Files of two or more
/// recognized languages are a fatal "mixed language push".
pub fn detect_language<'t>(
    table: &'t LanguageTable,
    changed: &[CommitFile],
) -> Result<Detection<'t>> {
    let mut selected: Option<usize> = None;
    let mut files = Vec::new();
    let mut languages: Vec<&'static str> = Vec::new();

    for file in changed.iter().filter(|f| f.status.is_gradable()) {
        let Some(index) = table.index_for(&file.filename) else {
            continue;
        };

        let name = table.profiles()[index].name;
        if !languages.contains(&name) {
            languages.push(name);
        }

        if *selected.get_or_insert(index) == index {
            files.push(file.filename.clone());
        }
    }

    if languages.len() > 1 {
        return Err(Error::MixedLanguages(format!(
            "changed files span {} languages ({}); push one language at a time",
            languages.len(),
            languages.join(", ")
        )));
    }

    Ok(match selected {
        None => Detection::Nothing,
        Some(index) => Detection::Detected {
            profile: &table.profiles()[index],
            files,
        },
    })
}
