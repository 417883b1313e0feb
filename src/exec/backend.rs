// src/exec/backend.rs

//! Pluggable process spawning.
//!
//! The orchestrator talks to a `ProcessSpawner` instead of calling
//! `tokio::process::Command` directly. Production code uses
//! [`ProveSpawner`]; tests provide a fake that never starts a real process.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::process::Stdio;

use tokio::io::AsyncRead;
use tokio::process::Command;
use tracing::debug;

use super::invocation::ProveInvocation;
use super::signal::ProcessExit;

/// One of the runner's output streams.
pub type ChildOutput = Box<dyn AsyncRead + Send + Unpin>;

/// Resolves once the spawned process has exited.
pub type ExitFuture = Pin<Box<dyn Future<Output = std::io::Result<ProcessExit>> + Send>>;

/// Live reference to a spawned runner, handed to the caller on `start`.
///
/// The caller owns the output streams and is responsible for draining them.
pub struct ChildHandle {
    pub pid: Option<u32>,
    pub stdout: Option<ChildOutput>,
    pub stderr: Option<ChildOutput>,
}

impl fmt::Debug for ChildHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChildHandle")
            .field("pid", &self.pid)
            .field("stdout", &self.stdout.is_some())
            .field("stderr", &self.stderr.is_some())
            .finish()
    }
}

/// A started process: the caller-facing handle plus its exit notification.
pub struct SpawnedProcess {
    pub handle: ChildHandle,
    pub exit: ExitFuture,
}

/// Trait abstracting how the runner process is started.
pub trait ProcessSpawner: Send + Sync {
    /// Start the process described by `invocation`.
    ///
    /// Errors here are spawn failures (e.g. binary not found); the process
    /// never started.
    fn spawn(&self, invocation: &ProveInvocation) -> std::io::Result<SpawnedProcess>;
}

/// Spawns the runner as a real OS process with piped stdout/stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProveSpawner;

impl ProcessSpawner for ProveSpawner {
    fn spawn(&self, invocation: &ProveInvocation) -> std::io::Result<SpawnedProcess> {
        debug!(
            program = %invocation.program().display(),
            args = ?invocation.args(),
            "spawning runner"
        );

        let mut child = Command::new(invocation.program())
            .args(invocation.args())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        let handle = ChildHandle {
            pid: child.id(),
            stdout: child.stdout.take().map(|s| Box::new(s) as ChildOutput),
            stderr: child.stderr.take().map(|s| Box::new(s) as ChildOutput),
        };

        let exit: ExitFuture = Box::pin(async move { child.wait().await.map(ProcessExit::from) });

        Ok(SpawnedProcess { handle, exit })
    }
}
