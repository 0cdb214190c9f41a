//! External tool invocation.
//!
//! The pipeline shells out to `plutil`, `r2` and `strings` rather than
//! reimplementing them. Every invocation goes through the [`ToolInvoker`]
//! trait so tests can substitute a scripted implementation.

use crate::error::{Result, TriageError};
use std::process::Command;

/// Captured output of a finished child process.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    pub stdout: String,
    pub stderr: String,
    pub success: bool,
}

impl ToolOutput {
    /// Stdout and stderr concatenated, for error reporting.
    pub fn combined(&self) -> String {
        if self.stderr.is_empty() {
            self.stdout.clone()
        } else if self.stdout.is_empty() {
            self.stderr.clone()
        } else {
            format!("{}\n{}", self.stdout, self.stderr)
        }
    }
}

/// Capability to run an external program and capture its output.
pub trait ToolInvoker {
    fn invoke(&self, program: &str, args: &[&str]) -> Result<ToolOutput>;
}

/// Production invoker backed by `std::process::Command`.
///
/// Invocations are synchronous and blocking; the caller suspends until the
/// child terminates and its output is fully captured.
pub struct SystemInvoker;

impl ToolInvoker for SystemInvoker {
    fn invoke(&self, program: &str, args: &[&str]) -> Result<ToolOutput> {
        let output = Command::new(program).args(args).output().map_err(|e| {
            TriageError::tool_failure(program, format!("failed to launch: {e}"))
        })?;

        Ok(ToolOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            success: output.status.success(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invoke_captures_stdout() {
        let output = SystemInvoker.invoke("echo", &["hello"]).unwrap();
        assert!(output.success);
        assert_eq!(output.stdout.trim(), "hello");
        assert!(output.stderr.is_empty());
    }

    #[test]
    fn test_invoke_missing_program() {
        let result = SystemInvoker.invoke("definitely-not-a-real-tool", &[]);
        match result {
            Err(TriageError::ToolFailure { tool, message }) => {
                assert_eq!(tool, "definitely-not-a-real-tool");
                assert!(message.contains("failed to launch"));
            }
            other => panic!("expected ToolFailure, got {other:?}"),
        }
    }

    #[test]
    fn test_invoke_nonzero_exit_is_not_an_error() {
        // Non-zero exit is reported through `success`, not as Err; callers
        // decide whether it is fatal and what context to attach.
        let output = SystemInvoker.invoke("false", &[]).unwrap();
        assert!(!output.success);
    }

    #[test]
    fn test_combined_output() {
        let output = ToolOutput {
            stdout: "out".to_string(),
            stderr: "err".to_string(),
            success: false,
        };
        assert_eq!(output.combined(), "out\nerr");

        let only_err = ToolOutput {
            stdout: String::new(),
            stderr: "err".to_string(),
            success: false,
        };
        assert_eq!(only_err.combined(), "err");
    }
}
