//! Subprocess invocation for the external tools bootstrap depends on.
//!
//! Every external collaborator (decoder, `ssh-keyscan`, `render`, `git`) is
//! called through [`ToolRunner`] so tests can swap in a recording fake.
//!
//! # Contract
//! - stdout is captured and returned as raw bytes.
//! - stderr is captured and surfaced in the error on failure.
//! - A non-zero exit is always an error; nothing is retried.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::error::{HarborError, Result};

/// Captured output of a successful invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl ToolOutput {
    pub fn stdout_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }
}

pub trait ToolRunner {
    /// Run `program` with `args`, failing on a non-zero exit.
    fn run(&self, program: &Path, args: &[String]) -> Result<ToolOutput>;
}

/// Runs tools as real child processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl ToolRunner for SystemRunner {
    fn run(&self, program: &Path, args: &[String]) -> Result<ToolOutput> {
        let name = program.display().to_string();
        tracing::debug!(program = %name, ?args, "running external tool");

        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| HarborError::ToolSpawnFailed {
                program: name.clone(),
                reason: e.to_string(),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(HarborError::ToolFailed {
                program: name,
                status: output.status.to_string(),
                stderr: stderr.trim().chars().take(500).collect(),
            });
        }

        Ok(ToolOutput {
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}

/// Locate `name` on `PATH`.
pub fn find_executable(name: &str) -> Option<PathBuf> {
    which::which(name).ok()
}
