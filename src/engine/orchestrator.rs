// src/engine/orchestrator.rs

//! Async driver for a single orchestration run.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::mpsc;
use tracing::{Instrument, debug, info, info_span, warn};

use crate::config::RunConfig;
use crate::config::run_config::RunParts;
use crate::errors::RunError;
use crate::exec::{ChildHandle, ProcessSpawner, SpawnedProcess};
use crate::hooks::invoke_hook;
use crate::types::HookStage;

use super::{LifecycleEvent, RunState};

static NEXT_RUN_ID: AtomicU64 = AtomicU64::new(1);

/// Starts orchestration runs using an injected [`ProcessSpawner`].
///
/// Runs started from the same orchestrator share only the spawner; each has
/// its own state and its own process.
pub struct Orchestrator<S> {
    spawner: Arc<S>,
}

impl<S> Clone for Orchestrator<S> {
    fn clone(&self) -> Self {
        Self {
            spawner: Arc::clone(&self.spawner),
        }
    }
}

impl<S> fmt::Debug for Orchestrator<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Orchestrator").finish_non_exhaustive()
    }
}

impl<S: ProcessSpawner + 'static> Orchestrator<S> {
    pub fn new(spawner: S) -> Self {
        Self::from_shared(Arc::new(spawner))
    }

    pub fn from_shared(spawner: Arc<S>) -> Self {
        Self { spawner }
    }

    /// Start a run on the current Tokio runtime and return its event stream.
    ///
    /// The run proceeds even if the returned handle is dropped.
    pub fn run(&self, config: RunConfig) -> RunHandle {
        let (tx, rx) = mpsc::channel::<LifecycleEvent>(4);
        let spawner = Arc::clone(&self.spawner);
        let run_id = NEXT_RUN_ID.fetch_add(1, Ordering::Relaxed);

        let span = info_span!("run", run_id);
        tokio::spawn(
            async move {
                let sink = EventSink::new(tx);
                drive(config, spawner.as_ref(), sink).await;
            }
            .instrument(span),
        );

        RunHandle { events: rx }
    }
}

/// Caller side of a run.
///
/// Read events one by one with [`next_event`](RunHandle::next_event), or
/// collapse the run into its outcome with [`wait`](RunHandle::wait).
#[derive(Debug)]
pub struct RunHandle {
    events: mpsc::Receiver<LifecycleEvent>,
}

impl RunHandle {
    /// Next event, or `None` once the terminal event has been delivered.
    pub async fn next_event(&mut self) -> Option<LifecycleEvent> {
        self.events.recv().await
    }

    /// Wait for the terminal event.
    ///
    /// `on_start` receives the child handle if the runner gets spawned, so
    /// its output can be relayed while the run continues.
    pub async fn wait<F>(mut self, on_start: F) -> Result<i32, RunError>
    where
        F: FnOnce(ChildHandle),
    {
        let mut on_start = Some(on_start);

        while let Some(event) = self.events.recv().await {
            match event {
                LifecycleEvent::Start(child) => {
                    if let Some(callback) = on_start.take() {
                        callback(child);
                    }
                }
                LifecycleEvent::End(code) => return Ok(code),
                LifecycleEvent::Error(err) => return Err(err),
            }
        }

        Err(RunError::Aborted)
    }
}

/// Sending half of a run's event stream, plus its current state.
struct EventSink {
    tx: mpsc::Sender<LifecycleEvent>,
    state: RunState,
}

impl EventSink {
    fn new(tx: mpsc::Sender<LifecycleEvent>) -> Self {
        Self {
            tx,
            state: RunState::Idle,
        }
    }

    fn transition(&mut self, to: RunState) {
        debug!(from = %self.state, %to, "run state transition");
        self.state = to;
    }

    async fn emit(&self, event: LifecycleEvent) {
        if let Err(e) = self.tx.send(event).await {
            debug!(event = ?e.0, "run handle dropped; discarding event");
        }
    }
}

/// Run the full sequence and publish exactly one terminal event.
async fn drive<S>(config: RunConfig, spawner: &S, mut sink: EventSink)
where
    S: ProcessSpawner + ?Sized,
{
    match execute(config, spawner, &mut sink).await {
        Ok(code) => {
            sink.transition(RunState::Done);
            info!(exit_code = code, "run finished");
            sink.emit(LifecycleEvent::End(code)).await;
        }
        Err(err) => {
            let from = sink.state;
            sink.transition(RunState::Failed);
            warn!(state = %from, error = %err, "run failed");
            sink.emit(LifecycleEvent::Error(err)).await;
        }
    }
}

async fn execute<S>(config: RunConfig, spawner: &S, sink: &mut EventSink) -> Result<i32, RunError>
where
    S: ProcessSpawner + ?Sized,
{
    let RunParts {
        invocation,
        before,
        after,
        hook_timeout,
    } = config.into_parts();

    sink.transition(RunState::BeforeHook);
    if let Some(hook) = before {
        invoke_hook(HookStage::Before, hook, hook_timeout)
            .await
            .map_err(RunError::BeforeHook)?;
    }

    sink.transition(RunState::Spawning);
    let SpawnedProcess { handle, exit } = spawner.spawn(&invocation).map_err(RunError::Spawn)?;

    info!(pid = ?handle.pid, cmd = %invocation, "runner started");
    sink.emit(LifecycleEvent::Start(handle)).await;

    sink.transition(RunState::Running);
    let exit = exit.await.map_err(RunError::Wait)?;

    if let Some(signal) = exit.signal {
        return Err(RunError::Signal(signal));
    }

    // Neither a code nor a signal: treat like a failed exit.
    let code = exit.code.unwrap_or(-1);
    info!(exit_code = code, "runner exited");

    sink.transition(RunState::AfterHook);
    if let Some(hook) = after {
        invoke_hook(HookStage::After, hook, hook_timeout)
            .await
            .map_err(RunError::AfterHook)?;
    }

    Ok(code)
}
