use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex};

use tokio::sync::oneshot;
use proving_ground::exec::{
    ChildHandle, ChildOutput, ExitFuture, ProcessExit, ProcessSpawner, ProveInvocation, SpawnedProcess,
};

/// How a scripted fake process behaves.
pub enum FakeExit {
    /// Exit immediately with this status.
    Immediate(ProcessExit),
    /// Exit when the paired sender fires (or with code 0 if it is dropped).
    Gated(oneshot::Receiver<ProcessExit>),
    /// Waiting on the process fails with this error.
    WaitError(io::ErrorKind),
    /// `spawn` itself fails with this error; no process exists.
    SpawnError(io::ErrorKind),
}

/// One scripted process: its exit behaviour and the bytes it "prints".
pub struct FakeProcess {
    pub exit: FakeExit,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl FakeProcess {
    pub fn exits(code: i32) -> Self {
        Self::with_exit(FakeExit::Immediate(ProcessExit::exited(code)))
    }

    pub fn killed_by(signal: &str) -> Self {
        Self::with_exit(FakeExit::Immediate(ProcessExit::signalled(signal)))
    }

    pub fn fails_to_spawn(kind: io::ErrorKind) -> Self {
        Self::with_exit(FakeExit::SpawnError(kind))
    }

    pub fn fails_to_wait(kind: io::ErrorKind) -> Self {
        Self::with_exit(FakeExit::WaitError(kind))
    }

    /// A process that stays "running" until the returned sender fires.
    pub fn gated() -> (Self, oneshot::Sender<ProcessExit>) {
        let (tx, rx) = oneshot::channel();
        (Self::with_exit(FakeExit::Gated(rx)), tx)
    }

    pub fn with_exit(exit: FakeExit) -> Self {
        Self {
            exit,
            stdout: Vec::new(),
            stderr: Vec::new(),
        }
    }

    pub fn stdout(mut self, bytes: impl Into<Vec<u8>>) -> Self {
        self.stdout = bytes.into();
        self
    }

    pub fn stderr(mut self, bytes: impl Into<Vec<u8>>) -> Self {
        self.stderr = bytes.into();
        self
    }
}

/// A fake spawner that:
/// - records every invocation it is asked to spawn
/// - plays back scripted processes in order (exit code 0 once the script
///   runs out)
#[derive(Clone, Default)]
pub struct FakeSpawner {
    script: Arc<Mutex<VecDeque<FakeProcess>>>,
    spawned: Arc<Mutex<Vec<ProveInvocation>>>,
}

impl FakeSpawner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_script(processes: impl IntoIterator<Item = FakeProcess>) -> Self {
        let spawner = Self::new();
        spawner.script.lock().unwrap().extend(processes);
        spawner
    }

    pub fn push(&self, process: FakeProcess) {
        self.script.lock().unwrap().push_back(process);
    }

    /// Invocations seen so far, including ones whose spawn failed.
    pub fn spawned(&self) -> Vec<ProveInvocation> {
        self.spawned.lock().unwrap().clone()
    }

    pub fn spawn_count(&self) -> usize {
        self.spawned.lock().unwrap().len()
    }
}

impl ProcessSpawner for FakeSpawner {
    fn spawn(&self, invocation: &ProveInvocation) -> io::Result<SpawnedProcess> {
        self.spawned.lock().unwrap().push(invocation.clone());

        let process = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| FakeProcess::exits(0));

        let handle = ChildHandle {
            pid: None,
            stdout: Some(Box::new(io::Cursor::new(process.stdout)) as ChildOutput),
            stderr: Some(Box::new(io::Cursor::new(process.stderr)) as ChildOutput),
        };

        let exit: ExitFuture = match process.exit {
            FakeExit::SpawnError(kind) => {
                return Err(io::Error::new(kind, "fake spawn failure"));
            }
            FakeExit::Immediate(exit) => Box::pin(async move { Ok::<_, io::Error>(exit) }),
            FakeExit::Gated(rx) => {
                Box::pin(async move {
                    Ok::<_, io::Error>(rx.await.unwrap_or_else(|_| ProcessExit::exited(0)))
                })
            }
            FakeExit::WaitError(kind) => {
                Box::pin(async move { Err::<ProcessExit, _>(io::Error::new(kind, "fake wait failure")) })
            }
        };

        Ok(SpawnedProcess { handle, exit })
    }
}
