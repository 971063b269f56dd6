//! Writers for the GitHub Actions job files

use crate::error::Result;
use std::io::Write;
use std::path::Path;

/// Heredoc delimiter for multiline `GITHUB_OUTPUT` values
pub const OUTPUT_DELIMITER: &str = "HWCHECK_EOF";

/// Appends to `GITHUB_OUTPUT` and `GITHUB_STEP_SUMMARY`
pub struct OutputWriter;

impl OutputWriter {
    /// Append Markdown to the step summary file
    pub fn append_step_summary(path: &Path, markdown: &str) -> Result<()> {
        let mut f = std::fs::OpenOptions::new()
            .append(true)
            .create(true)
            .open(path)?;
        f.write_all(markdown.as_bytes())?;
        if !markdown.ends_with('\n') {
            f.write_all(b"\n")?;
        }
        Ok(())
    }

    /// Append `name=value` pairs to the outputs file
    ///
    /// Values containing a newline use the `name<<DELIM` form.
    pub fn write_outputs(path: &Path, outputs: &[(&str, &str)]) -> Result<()> {
        let mut f = std::fs::OpenOptions::new()
            .append(true)
            .create(true)
            .open(path)?;
        f.write_all(Self::format_outputs(outputs).as_bytes())?;
        Ok(())
    }

    /// Render outputs in the `GITHUB_OUTPUT` file syntax
    pub fn format_outputs(outputs: &[(&str, &str)]) -> String {
        let mut buf = String::new();
        for (name, value) in outputs {
            if value.contains('\n') || value.contains('\r') {
                buf.push_str(name);
                buf.push_str("<<");
                buf.push_str(OUTPUT_DELIMITER);
                buf.push('\n');
                buf.push_str(value);
                buf.push('\n');
                buf.push_str(OUTPUT_DELIMITER);
                buf.push('\n');
            } else {
                buf.push_str(name);
                buf.push('=');
                buf.push_str(value);
                buf.push('\n');
            }
        }
        buf
    }
}
