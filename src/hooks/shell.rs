// src/hooks/shell.rs

//! Hooks defined as shell commands.

use std::process::ExitStatus;

use thiserror::Error;
use tokio::process::Command;
use tracing::info;

use super::{Completion, Hook, HookError, HookReturn};

/// A shell command exited unsuccessfully.
#[derive(Error, Debug)]
#[error("hook command `{command}` exited with {status}")]
pub struct ShellHookFailed {
    pub command: String,
    pub status: ExitStatus,
}

/// Runs a command through the platform shell and succeeds on exit status 0.
///
/// Stdio is inherited, so hook output shows up alongside the runner's.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellHook {
    command: String,
}

impl ShellHook {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    /// Run the command to completion.
    pub async fn run(self) -> Result<(), HookError> {
        info!(cmd = %self.command, "running hook command");

        // Build a shell command appropriate for the platform.
        let mut cmd = if cfg!(windows) {
            let mut c = Command::new("cmd");
            c.arg("/C").arg(&self.command);
            c
        } else {
            let mut c = Command::new("sh");
            c.arg("-c").arg(&self.command);
            c
        };

        let status = cmd
            .kill_on_drop(true)
            .status()
            .await
            .map_err(|e| {
                HookError::new(e).context(format!("spawning hook command `{}`", self.command))
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(HookError::new(ShellHookFailed {
                command: self.command,
                status,
            }))
        }
    }
}

impl Hook for ShellHook {
    fn call(self: Box<Self>, _done: Completion) -> Result<HookReturn, HookError> {
        Ok(HookReturn::awaitable((*self).run()))
    }
}
