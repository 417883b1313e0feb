#![allow(dead_code)]

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use proving_ground::hooks::{Completion, Hook, HookError, HookReturn};

/// Counts how many times the hooks built from it were called.
#[derive(Debug, Clone, Default)]
pub struct CallCounter(Arc<AtomicUsize>);

impl CallCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }

    fn bump(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

/// Error carried by the failing test hooks, so tests can downcast to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestHookError(pub String);

impl fmt::Display for TestHookError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "test hook error: {}", self.0)
    }
}

impl std::error::Error for TestHookError {}

fn failure(msg: &str) -> HookError {
    HookError::new(TestHookError(msg.to_string()))
}

/// Builder for hooks in each signalling style, all counting their calls.
pub struct HookBuilder {
    counter: CallCounter,
}

impl HookBuilder {
    pub fn new(counter: &CallCounter) -> Self {
        Self {
            counter: counter.clone(),
        }
    }

    /// Signals success through the completion.
    pub fn callback_ok(self) -> impl Hook + 'static {
        let counter = self.counter;
        move |done: Completion| -> Result<HookReturn, HookError> {
            counter.bump();
            done.succeed();
            Ok(HookReturn::Pending)
        }
    }

    /// Signals failure through the completion.
    pub fn callback_err(self, msg: &str) -> impl Hook + 'static {
        let counter = self.counter;
        let err = failure(msg);
        move |done: Completion| -> Result<HookReturn, HookError> {
            counter.bump();
            done.fail(err);
            Ok(HookReturn::Pending)
        }
    }

    /// Signals through the completion from a background task after `delay`.
    pub fn callback_later(self, delay: Duration) -> impl Hook + 'static {
        let counter = self.counter;
        move |done: Completion| -> Result<HookReturn, HookError> {
            counter.bump();
            tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                done.succeed();
            });
            Ok(HookReturn::Pending)
        }
    }

    /// Returns an awaitable that resolves.
    pub fn awaitable_ok(self) -> impl Hook + 'static {
        let counter = self.counter;
        move |_done: Completion| -> Result<HookReturn, HookError> {
            counter.bump();
            Ok(HookReturn::awaitable(async { Ok(()) }))
        }
    }

    /// Returns an awaitable that rejects.
    pub fn awaitable_err(self, msg: &str) -> impl Hook + 'static {
        let counter = self.counter;
        let err = failure(msg);
        move |_done: Completion| -> Result<HookReturn, HookError> {
            counter.bump();
            Ok(HookReturn::awaitable(async move { Err(err) }))
        }
    }

    /// Fails immediately, before returning anything.
    pub fn throws(self, msg: &str) -> impl Hook + 'static {
        let counter = self.counter;
        let err = failure(msg);
        move |_done: Completion| -> Result<HookReturn, HookError> {
            counter.bump();
            Err(err)
        }
    }

    /// Returns `Pending` but never signals; holds the completion forever.
    pub fn never(self) -> impl Hook + 'static {
        let counter = self.counter;
        move |done: Completion| -> Result<HookReturn, HookError> {
            counter.bump();
            tokio::spawn(async move {
                let _held = done;
                std::future::pending::<()>().await;
            });
            Ok(HookReturn::Pending)
        }
    }
}
