// src/errors.rs

//! Crate-wide error types.
//!
//! - [`ProvingGroundError`] covers the config / CLI layer.
//! - [`RunError`] is the failure value carried by a
//!   [`LifecycleEvent::Error`](crate::engine::LifecycleEvent::Error).

use thiserror::Error;

use crate::hooks::HookError;

#[derive(Error, Debug)]
pub enum ProvingGroundError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),
}

/// Why an orchestration run failed.
///
/// Hook errors are carried exactly as the hook produced them, so callers can
/// `downcast_ref` to their own error types.
#[derive(Error, Debug)]
pub enum RunError {
    #[error("before hook failed: {0:#}")]
    BeforeHook(HookError),

    #[error("failed to spawn test runner: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("failed waiting for test runner to exit: {0}")]
    Wait(#[source] std::io::Error),

    /// Name of the signal that terminated the runner, e.g. `SIGTERM`.
    #[error("test runner terminated by signal {0}")]
    Signal(String),

    #[error("after hook failed: {0:#}")]
    AfterHook(HookError),

    /// The run's task went away without publishing a terminal event.
    #[error("run ended without reporting an outcome")]
    Aborted,
}

impl RunError {
    /// The hook's own error, for the two hook failure variants.
    pub fn hook_error(&self) -> Option<&HookError> {
        match self {
            RunError::BeforeHook(err) | RunError::AfterHook(err) => Some(err),
            _ => None,
        }
    }

    /// True if the failure happened before the runner was started.
    pub fn is_pre_spawn(&self) -> bool {
        matches!(self, RunError::BeforeHook(_) | RunError::Spawn(_))
    }
}

pub type Result<T> = std::result::Result<T, ProvingGroundError>;
