// src/engine/mod.rs

//! Orchestration engine.
//!
//! One run is a straight line:
//!
//! `Idle -> BeforeHook -> Spawning -> Running -> AfterHook -> Done`
//!
//! with a side exit to `Failed` from any of the middle states. Progress is
//! published to the caller as [`LifecycleEvent`]s; [`orchestrator`] holds
//! the async driver and the [`RunHandle`] the caller reads events from.

use std::fmt;

use crate::errors::RunError;
use crate::exec::ChildHandle;

pub mod orchestrator;

pub use orchestrator::{Orchestrator, RunHandle};

/// Events published by a run, in order.
///
/// A run emits at most one `Start`, and exactly one of `End` / `Error`.
#[derive(Debug)]
pub enum LifecycleEvent {
    /// The runner was spawned. Carries its output streams.
    Start(ChildHandle),
    /// The run finished; carries the runner's exit code.
    End(i32),
    /// The run failed. Terminal.
    Error(RunError),
}

impl LifecycleEvent {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, LifecycleEvent::Start(_))
    }
}

/// Where a run currently is. Used for logging transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    BeforeHook,
    Spawning,
    Running,
    AfterHook,
    Done,
    Failed,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RunState::Idle => "idle",
            RunState::BeforeHook => "before-hook",
            RunState::Spawning => "spawning",
            RunState::Running => "running",
            RunState::AfterHook => "after-hook",
            RunState::Done => "done",
            RunState::Failed => "failed",
        };
        f.write_str(s)
    }
}
