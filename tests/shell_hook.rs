// tests/shell_hook.rs

#![cfg(unix)]

use tempfile::TempDir;

use proving_ground::config::RunConfig;
use proving_ground::engine::Orchestrator;
use proving_ground::errors::RunError;
use proving_ground::hooks::ShellHook;
use proving_ground::hooks::shell::ShellHookFailed;
use proving_ground_test_utils::fake_spawner::{FakeProcess, FakeSpawner};
use proving_ground_test_utils::{init_tracing, with_timeout};

#[tokio::test]
async fn successful_command_succeeds() {
    init_tracing();

    let outcome = with_timeout(ShellHook::new("exit 0").run()).await;
    assert!(outcome.is_ok(), "{outcome:?}");
}

#[tokio::test]
async fn failing_command_reports_command_and_status() {
    init_tracing();

    let err = with_timeout(ShellHook::new("exit 4").run())
        .await
        .unwrap_err();

    let failed = err
        .downcast_ref::<ShellHookFailed>()
        .expect("ShellHookFailed");
    assert_eq!(failed.command, "exit 4");
    assert_eq!(failed.status.code(), Some(4));
}

#[tokio::test]
async fn shell_hooks_wrap_the_run() {
    init_tracing();

    let dir = TempDir::new().unwrap();
    let marker = dir.path().join("ran");
    let before = format!("touch '{}'", marker.display());
    let after = format!("test -f '{}' && rm '{}'", marker.display(), marker.display());

    let spawner = FakeSpawner::with_script([FakeProcess::exits(0)]);
    let config = RunConfig::new()
        .before(ShellHook::new(before))
        .after(ShellHook::new(after));

    let outcome = with_timeout(Orchestrator::new(spawner.clone()).run(config).wait(|_| {})).await;

    assert_eq!(outcome.unwrap(), 0);
    assert_eq!(spawner.spawn_count(), 1);
    assert!(!marker.exists(), "after hook should have removed the marker");
}

#[tokio::test]
async fn failing_before_command_stops_the_run() {
    init_tracing();

    let spawner = FakeSpawner::new();
    let config = RunConfig::new().before(ShellHook::new("exit 1"));

    let outcome = with_timeout(Orchestrator::new(spawner.clone()).run(config).wait(|_| {})).await;

    match outcome {
        Err(err @ RunError::BeforeHook(_)) => {
            let hook_err = err.hook_error().unwrap();
            assert!(hook_err.downcast_ref::<ShellHookFailed>().is_some());
        }
        other => panic!("expected before-hook failure, got {other:?}"),
    }
    assert_eq!(spawner.spawn_count(), 0);
}
