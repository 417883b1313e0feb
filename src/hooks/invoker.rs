// src/hooks/invoker.rs

//! Normalizes the three hook signalling styles into one outcome.

use std::panic::{self, AssertUnwindSafe};
use std::time::Duration;

use futures::FutureExt;
use tracing::{debug, warn};

use crate::types::HookStage;

use super::{
    Completion, CompletionDropped, Hook, HookError, HookPanicked, HookReturn, HookTimeout,
};

/// Call `hook` once and wait for its outcome.
///
/// - An immediate `Err` is the outcome; the completion is ignored.
/// - An awaitable is raced against the completion, first settled wins. The
///   awaitable is polled first, so it wins when both are ready.
/// - A `Pending` hook settles through its completion. Dropping the
///   completion without signalling fails with [`CompletionDropped`].
/// - A panic, during the call or inside the awaitable, fails with
///   [`HookPanicked`].
///
/// Without a `timeout` a hook that never settles stalls the caller forever.
pub async fn invoke_hook(
    stage: HookStage,
    hook: Box<dyn Hook>,
    timeout: Option<Duration>,
) -> Result<(), HookError> {
    debug!(%stage, ?timeout, "invoking hook");

    let outcome = match timeout {
        Some(limit) => match tokio::time::timeout(limit, settle(hook)).await {
            Ok(outcome) => outcome,
            Err(_) => Err(HookError::new(HookTimeout(limit))),
        },
        None => settle(hook).await,
    };

    match &outcome {
        Ok(()) => debug!(%stage, "hook succeeded"),
        Err(err) => debug!(%stage, error = %err, "hook failed"),
    }

    outcome
}

async fn settle(hook: Box<dyn Hook>) -> Result<(), HookError> {
    let (completion, mut completion_rx) = Completion::channel();

    let returned = panic::catch_unwind(AssertUnwindSafe(|| hook.call(completion)))
        .map_err(panicked)?;

    match returned? {
        HookReturn::Pending => match completion_rx.await {
            Ok(outcome) => outcome,
            Err(_) => Err(HookError::new(CompletionDropped)),
        },
        HookReturn::Awaitable(fut) => {
            let fut = AssertUnwindSafe(fut)
                .catch_unwind()
                .map(|caught| caught.unwrap_or_else(|payload| Err(panicked(payload))));

            tokio::select! {
                biased;

                outcome = fut => outcome,
                // A dropped completion disables this branch; keep waiting
                // on the awaitable.
                Ok(outcome) = &mut completion_rx => outcome,
            }
        }
    }
}

fn panicked(payload: Box<dyn std::any::Any + Send>) -> HookError {
    let err = HookPanicked::from_payload(payload);
    warn!(error = %err, "hook panicked");
    HookError::new(err)
}
