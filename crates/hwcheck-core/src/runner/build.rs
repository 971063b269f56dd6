//! Compilation of student sources

use crate::coordination::entry_point::Project;
use crate::error::{Error, Result};
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

/// Compile the project when its language needs it
///
/// Every relevant changed source is passed to the compiler in one
/// invocation. Returns the resolved command line, or `None` for interpreted
/// languages. A non-zero exit carries the combined compiler output.
pub async fn compile(project: &Project<'_>, build_output: &Path) -> Result<Option<Vec<String>>> {
    let Some(template) = project.profile.compile else {
        return Ok(None);
    };

    let args = template.resolve(&project.command_context(build_output));
    let Some((program, rest)) = args.split_first() else {
        return Err(Error::Config(format!(
            "empty compile command for {}",
            project.profile.name
        )));
    };

    tracing::info!(command = %args.join(" "), "compiling student code");

    let output = Command::new(program)
        .args(rest)
        .stdin(Stdio::null())
        .output()
        .await
        .map_err(|e| Error::Compile(format!("failed to start `{}`: {}", program, e)))?;

    if !output.status.success() {
        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));
        return Err(Error::Compile(format!(
            "Failed to compile student code ({}).\nCompiler Output:\n{}",
            output.status, combined
        )));
    }

    tracing::info!("compilation successful");
    Ok(Some(args))
}
