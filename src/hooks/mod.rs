// src/hooks/mod.rs

//! User hooks run around the test runner.
//!
//! A hook receives a [`Completion`] and may report its outcome in one of
//! three ways:
//!
//! - return `Err(e)` straight away (immediate failure),
//! - return [`HookReturn::Awaitable`] with a future that settles later,
//! - return [`HookReturn::Pending`] and signal through the [`Completion`].
//!
//! [`invoke_hook`] normalizes all three into a single `Result<(), HookError>`.
//! [`ShellHook`] is the hook type used by the CLI.

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use thiserror::Error;
use tokio::sync::oneshot;

pub mod invoker;
pub mod shell;

pub use invoker::invoke_hook;
pub use shell::ShellHook;

/// Failure value produced by a hook. Kept exactly as the hook produced it.
pub type HookError = anyhow::Error;

/// Future returned by awaitable-style hooks.
pub type HookFuture = Pin<Box<dyn Future<Output = Result<(), HookError>> + Send + 'static>>;

/// What a hook hands back when it is called.
pub enum HookReturn {
    /// The hook will report through its [`Completion`].
    Pending,
    /// The hook's outcome is the output of this future.
    Awaitable(HookFuture),
}

impl HookReturn {
    /// Wrap any `Send` future as an awaitable return value.
    pub fn awaitable<F>(fut: F) -> Self
    where
        F: Future<Output = Result<(), HookError>> + Send + 'static,
    {
        HookReturn::Awaitable(Box::pin(fut))
    }
}

impl fmt::Debug for HookReturn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HookReturn::Pending => f.write_str("Pending"),
            HookReturn::Awaitable(_) => f.write_str("Awaitable(..)"),
        }
    }
}

/// A unit of user code run at a lifecycle boundary.
///
/// Hooks are consumed by the call, so each one runs at most once.
pub trait Hook: Send {
    fn call(self: Box<Self>, done: Completion) -> Result<HookReturn, HookError>;
}

impl<F> Hook for F
where
    F: FnOnce(Completion) -> Result<HookReturn, HookError> + Send,
{
    fn call(self: Box<Self>, done: Completion) -> Result<HookReturn, HookError> {
        (*self)(done)
    }
}

/// Pin down a closure's signature so it can be passed where a [`Hook`] is
/// expected without annotating its argument and return types.
///
/// ```
/// use proving_ground::hooks::{self, HookReturn};
///
/// let hook = hooks::from_fn(|done| {
///     done.succeed();
///     Ok(HookReturn::Pending)
/// });
/// # let _ = hook;
/// ```
pub fn from_fn<F>(f: F) -> F
where
    F: FnOnce(Completion) -> Result<HookReturn, HookError> + Send,
{
    f
}

/// Continuation handed to every hook.
///
/// Only the first signal counts; the value is consumed on use.
#[derive(Debug)]
pub struct Completion {
    tx: oneshot::Sender<Result<(), HookError>>,
}

impl Completion {
    pub(crate) fn channel() -> (Self, oneshot::Receiver<Result<(), HookError>>) {
        let (tx, rx) = oneshot::channel();
        (Self { tx }, rx)
    }

    /// Signal completion, with `Some(err)` meaning failure.
    pub fn complete(self, err: Option<HookError>) {
        let outcome = match err {
            Some(err) => Err(err),
            None => Ok(()),
        };
        // The invoker may already have settled through the awaitable.
        let _ = self.tx.send(outcome);
    }

    pub fn succeed(self) {
        self.complete(None);
    }

    pub fn fail(self, err: impl Into<HookError>) {
        self.complete(Some(err.into()));
    }
}

/// A `Pending` hook dropped its [`Completion`] without signalling.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("hook dropped its completion without signalling an outcome")]
pub struct CompletionDropped;

/// A hook panicked, either when called or while its awaitable was polled.
///
/// Carries the panic message when the payload was a string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("hook panicked: {0}")]
pub struct HookPanicked(pub String);

impl HookPanicked {
    pub(crate) fn from_payload(payload: Box<dyn std::any::Any + Send>) -> Self {
        let message = match payload.downcast::<String>() {
            Ok(msg) => *msg,
            Err(payload) => match payload.downcast::<&'static str>() {
                Ok(msg) => (*msg).to_string(),
                Err(_) => "non-string panic payload".to_string(),
            },
        };
        Self(message)
    }
}

/// A hook did not settle within the configured timeout.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("hook did not complete within {0:?}")]
pub struct HookTimeout(pub std::time::Duration);
