//! External code-style fixer run on written files.

use std::path::Path;
use std::process::{Command, Stdio};

use crate::config::FormatterCommand;

const FILE_PLACEHOLDER: &str = "{file}";

/// What happened when the formatter ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatStatus {
    /// No formatter configured.
    Skipped,
    Formatted,
    /// The formatter ran and exited unsuccessfully.
    Failed { code: Option<i32>, stderr: String },
    /// The formatter could not be started.
    SpawnFailed { message: String },
}

impl FormatStatus {
    pub fn is_failure(&self) -> bool {
        matches!(self, FormatStatus::Failed { .. } | FormatStatus::SpawnFailed { .. })
    }
}

/// Runs the configured formatter. Failures are reported, never fatal: the
/// file has already been written.
#[derive(Debug, Clone, Default)]
pub struct SourceFormatter {
    command: Option<FormatterCommand>,
}

impl SourceFormatter {
    pub fn new(command: Option<FormatterCommand>) -> Self {
        Self { command }
    }

    /// Arguments with `{file}` substituted, or the path appended.
    fn args_for(command: &FormatterCommand, path: &Path) -> Vec<String> {
        let file = path.display().to_string();
        if command.args.iter().any(|arg| arg.contains(FILE_PLACEHOLDER)) {
            command
                .args
                .iter()
                .map(|arg| arg.replace(FILE_PLACEHOLDER, &file))
                .collect()
        } else {
            let mut args = command.args.clone();
            args.push(file);
            args
        }
    }

    pub fn run(&self, path: &Path) -> FormatStatus {
        let Some(command) = &self.command else {
            return FormatStatus::Skipped;
        };

        let args = Self::args_for(command, path);
        tracing::debug!(program = %command.program, ?args, "running formatter");

        let output = Command::new(&command.program)
            .args(&args)
            .stdin(Stdio::null())
            .output();

        match output {
            Ok(output) if output.status.success() => FormatStatus::Formatted,
            Ok(output) => {
                let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
                tracing::warn!(
                    program = %command.program,
                    code = ?output.status.code(),
                    file = %path.display(),
                    "formatter failed"
                );
                FormatStatus::Failed {
                    code: output.status.code(),
                    stderr,
                }
            }
            Err(e) => {
                tracing::warn!(program = %command.program, error = %e, "formatter could not be started");
                FormatStatus::SpawnFailed {
                    message: e.to_string(),
                }
            }
        }
    }
}
