// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`invocation`] builds the `prove` command line.
//! - [`backend`] provides the `ProcessSpawner` trait and the production
//!   `ProveSpawner`, which tests replace with a fake.
//! - [`signal`] maps exit statuses, including signal names.
//! - [`relay`] copies the runner's output to our own stdout/stderr.

pub mod backend;
pub mod invocation;
pub mod relay;
pub mod signal;

pub use backend::{ChildHandle, ChildOutput, ExitFuture, ProcessSpawner, ProveSpawner, SpawnedProcess};
pub use invocation::{DEFAULT_PROGRAM, ProveInvocation};
pub use relay::OutputRelay;
pub use signal::{ProcessExit, signal_name};
