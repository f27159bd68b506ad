//! External process execution.

use std::path::PathBuf;
use std::process::Command;

use anyhow::{Context, Result};
use tracing::debug;

/// A fully-resolved invocation. Arguments are passed as-is, never through a shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub current_dir: PathBuf,
}

impl ToolCommand {
    /// Human-readable command line for logs.
    pub fn display(&self) -> String {
        let mut out = self.program.display().to_string();
        for a in &self.args {
            out.push(' ');
            out.push_str(a);
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Stdout followed by stderr, joined with a newline.
    pub text: String,
    /// `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
}

/// Runs one external command to completion.
///
/// A non-zero exit is not an error here: linters exit non-zero when they find
/// something. `Err` means the process could not be started at all.
pub trait ProcessRunner {
    fn run(&self, command: &ToolCommand) -> Result<ProcessOutput>;
}

/// Spawns real processes and blocks until they exit. There is no timeout.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(&self, command: &ToolCommand) -> Result<ProcessOutput> {
        debug!(
            "exec `{}` in {}",
            command.display(),
            command.current_dir.display()
        );
        let output = Command::new(&command.program)
            .args(&command.args)
            .current_dir(&command.current_dir)
            .output()
            .with_context(|| format!("run {}", command.program.display()))?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        Ok(ProcessOutput {
            text: merge_streams(&stdout, &stderr),
            exit_code: output.status.code(),
        })
    }
}

fn merge_streams(stdout: &str, stderr: &str) -> String {
    match (stdout.is_empty(), stderr.is_empty()) {
        (_, true) => stdout.to_string(),
        (true, false) => stderr.to_string(),
        (false, false) => {
            let mut text = stdout.trim_end_matches('\n').to_string();
            text.push('\n');
            text.push_str(stderr);
            text
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merges_stdout_before_stderr() {
        assert_eq!(merge_streams("[]\n", "warn\n"), "[]\nwarn\n");
        assert_eq!(merge_streams("[]", "warn"), "[]\nwarn");
        assert_eq!(merge_streams("out", ""), "out");
        assert_eq!(merge_streams("", "err"), "err");
    }

    #[test]
    fn display_joins_program_and_args() {
        let cmd = ToolCommand {
            program: PathBuf::from("vendor/bin/phpstan"),
            args: vec!["analyse".to_string(), "--error-format=json".to_string()],
            current_dir: PathBuf::from("/repo"),
        };
        assert_eq!(cmd.display(), "vendor/bin/phpstan analyse --error-format=json");
    }

    #[cfg(unix)]
    #[test]
    fn system_runner_captures_both_streams_and_status() {
        let dir = tempfile::tempdir().unwrap();
        let cmd = ToolCommand {
            program: PathBuf::from("sh"),
            args: vec![
                "-c".to_string(),
                "pwd; echo oops >&2; exit 3".to_string(),
            ],
            current_dir: dir.path().to_path_buf(),
        };
        let out = SystemRunner.run(&cmd).unwrap();
        assert_eq!(out.exit_code, Some(3));
        assert!(out.text.ends_with("\noops\n"), "got {:?}", out.text);
    }

    #[test]
    fn missing_program_is_an_error() {
        let cmd = ToolCommand {
            program: PathBuf::from("/definitely/not/a/program"),
            args: vec![],
            current_dir: std::env::temp_dir(),
        };
        assert!(SystemRunner.run(&cmd).is_err());
    }
}
