// tests/orchestrator_lifecycle.rs

use std::io;

use tokio::io::AsyncReadExt;

use proving_ground::config::RunConfig;
use proving_ground::engine::{LifecycleEvent, Orchestrator, RunHandle};
use proving_ground::errors::RunError;
use proving_ground::exec::ProcessExit;
use proving_ground::hooks::{self, HookPanicked, HookReturn};
use proving_ground_test_utils::builders::{CallCounter, HookBuilder, TestHookError};
use proving_ground_test_utils::fake_spawner::{FakeExit, FakeProcess, FakeSpawner};
use proving_ground_test_utils::{init_tracing, with_timeout};

/// Drain a run's events until the channel closes.
async fn collect_events(mut handle: RunHandle) -> Vec<LifecycleEvent> {
    with_timeout(async move {
        let mut events = Vec::new();
        while let Some(event) = handle.next_event().await {
            events.push(event);
        }
        events
    })
    .await
}

fn expect_hook_error(err: &RunError, msg: &str) {
    let hook_err = err.hook_error().expect("expected a hook failure");
    let inner = hook_err
        .downcast_ref::<TestHookError>()
        .expect("hook error should be passed through unmodified");
    assert_eq!(inner.0, msg);
}

#[tokio::test]
async fn run_without_hooks_emits_start_then_end_with_exit_code() {
    init_tracing();

    let spawner = FakeSpawner::with_script([FakeProcess::exits(3)]);
    let orchestrator = Orchestrator::new(spawner.clone());

    let events = collect_events(orchestrator.run(RunConfig::new())).await;

    assert_eq!(events.len(), 2, "events: {events:?}");
    assert!(matches!(events[0], LifecycleEvent::Start(_)));
    assert!(matches!(events[1], LifecycleEvent::End(3)));
    assert!(!events[0].is_terminal());
    assert!(events[1].is_terminal());
    assert_eq!(spawner.spawn_count(), 1);
}

#[tokio::test]
async fn start_event_hands_over_output_streams() {
    init_tracing();

    let spawner = FakeSpawner::with_script([FakeProcess::exits(0)
        .stdout("ok 1 - works\n")
        .stderr("# warning\n")]);
    let orchestrator = Orchestrator::new(spawner);

    let mut handle = orchestrator.run(RunConfig::new());
    let event = with_timeout(handle.next_event()).await;

    let Some(LifecycleEvent::Start(mut child)) = event else {
        panic!("expected start event, got {event:?}");
    };

    let mut out = String::new();
    child
        .stdout
        .take()
        .expect("stdout handed over")
        .read_to_string(&mut out)
        .await
        .unwrap();
    let mut err = String::new();
    child
        .stderr
        .take()
        .expect("stderr handed over")
        .read_to_string(&mut err)
        .await
        .unwrap();

    assert_eq!(out, "ok 1 - works\n");
    assert_eq!(err, "# warning\n");
}

#[tokio::test]
async fn default_config_spawns_prove_with_default_arguments() {
    init_tracing();

    let spawner = FakeSpawner::new();
    let orchestrator = Orchestrator::new(spawner.clone());

    collect_events(orchestrator.run(RunConfig::default())).await;

    let spawned = spawner.spawned();
    assert_eq!(spawned.len(), 1);
    assert_eq!(spawned[0].program().to_str(), Some("prove"));
    assert_eq!(spawned[0].args(), ["--exec", "node", "--jobs", "1"]);
}

#[tokio::test]
async fn configured_exec_jobs_and_files_are_passed_in_order() {
    init_tracing();

    let spawner = FakeSpawner::new();
    let orchestrator = Orchestrator::new(spawner.clone());

    let config = RunConfig::new()
        .exec("mocha")
        .num_processes(4)
        .files(["a/*.js", "b/*.js"]);
    collect_events(orchestrator.run(config)).await;

    let spawned = spawner.spawned();
    assert!(
        spawned[0]
            .args()
            .ends_with(&["--exec", "mocha", "--jobs", "4", "a/*.js", "b/*.js"].map(String::from)),
        "args: {:?}",
        spawned[0].args()
    );
}

#[tokio::test]
async fn before_hook_success_in_every_style_leads_to_spawn() {
    init_tracing();

    for style in ["callback", "awaitable"] {
        let counter = CallCounter::new();
        let builder = HookBuilder::new(&counter);
        let config = match style {
            "callback" => RunConfig::new().before(builder.callback_ok()),
            _ => RunConfig::new().before(builder.awaitable_ok()),
        };

        let spawner = FakeSpawner::new();
        let events = collect_events(Orchestrator::new(spawner.clone()).run(config)).await;

        assert!(matches!(events[0], LifecycleEvent::Start(_)), "{style}: {events:?}");
        assert!(matches!(events[1], LifecycleEvent::End(0)), "{style}: {events:?}");
        assert_eq!(counter.get(), 1, "{style}: hook called once");
        assert_eq!(spawner.spawn_count(), 1, "{style}");
    }
}

#[tokio::test]
async fn before_hook_failure_in_every_style_prevents_spawn() {
    init_tracing();

    for style in ["throws", "awaitable", "callback"] {
        let counter = CallCounter::new();
        let builder = HookBuilder::new(&counter);
        let config = match style {
            "throws" => RunConfig::new().before(builder.throws("boom")),
            "awaitable" => RunConfig::new().before(builder.awaitable_err("boom")),
            _ => RunConfig::new().before(builder.callback_err("boom")),
        };

        let spawner = FakeSpawner::new();
        let events = collect_events(Orchestrator::new(spawner.clone()).run(config)).await;

        assert_eq!(events.len(), 1, "{style}: {events:?}");
        match &events[0] {
            LifecycleEvent::Error(err @ RunError::BeforeHook(_)) => expect_hook_error(err, "boom"),
            other => panic!("{style}: expected before-hook error, got {other:?}"),
        }
        assert_eq!(spawner.spawn_count(), 0, "{style}: runner must not be spawned");
        assert_eq!(counter.get(), 1, "{style}: hook called once");
    }
}

#[tokio::test]
async fn after_hook_failure_replaces_end_with_error() {
    init_tracing();

    for style in ["throws", "awaitable", "callback"] {
        let counter = CallCounter::new();
        let builder = HookBuilder::new(&counter);
        let config = match style {
            "throws" => RunConfig::new().after(builder.throws("teardown")),
            "awaitable" => RunConfig::new().after(builder.awaitable_err("teardown")),
            _ => RunConfig::new().after(builder.callback_err("teardown")),
        };

        let spawner = FakeSpawner::with_script([FakeProcess::exits(0)]);
        let events = collect_events(Orchestrator::new(spawner.clone()).run(config)).await;

        assert_eq!(events.len(), 2, "{style}: {events:?}");
        assert!(matches!(events[0], LifecycleEvent::Start(_)), "{style}");
        match &events[1] {
            LifecycleEvent::Error(err @ RunError::AfterHook(_)) => {
                expect_hook_error(err, "teardown")
            }
            other => panic!("{style}: expected after-hook error, got {other:?}"),
        }
        assert_eq!(counter.get(), 1, "{style}: hook called once");
    }
}

#[tokio::test]
async fn after_hook_runs_only_once_the_runner_has_exited() {
    init_tracing();

    let counter = CallCounter::new();
    let (process, exit_tx) = FakeProcess::gated();
    let spawner = FakeSpawner::with_script([process]);
    let config = RunConfig::new().after(HookBuilder::new(&counter).awaitable_ok());

    let mut handle = Orchestrator::new(spawner).run(config);

    let first = with_timeout(handle.next_event()).await;
    assert!(matches!(first, Some(LifecycleEvent::Start(_))));

    tokio::task::yield_now().await;
    assert_eq!(counter.get(), 0, "after hook must wait for the runner");

    exit_tx.send(ProcessExit::exited(7)).unwrap();

    let last = with_timeout(handle.next_event()).await;
    assert!(matches!(last, Some(LifecycleEvent::End(7))), "{last:?}");
    assert_eq!(counter.get(), 1);
    assert!(with_timeout(handle.next_event()).await.is_none());
}

#[tokio::test]
async fn signal_termination_is_an_error_carrying_the_signal_name() {
    init_tracing();

    let counter = CallCounter::new();
    let spawner = FakeSpawner::with_script([FakeProcess::killed_by("SIGTERM")]);
    let config = RunConfig::new().after(HookBuilder::new(&counter).callback_ok());

    let events = collect_events(Orchestrator::new(spawner).run(config)).await;

    assert_eq!(events.len(), 2, "{events:?}");
    assert!(matches!(events[0], LifecycleEvent::Start(_)));
    match &events[1] {
        LifecycleEvent::Error(RunError::Signal(name)) => assert_eq!(name, "SIGTERM"),
        other => panic!("expected signal error, got {other:?}"),
    }
    assert_eq!(counter.get(), 0, "after hook is skipped on signal termination");
}

#[tokio::test]
async fn spawn_failure_is_an_error_without_start() {
    init_tracing();

    let counter = CallCounter::new();
    let spawner = FakeSpawner::with_script([FakeProcess::fails_to_spawn(io::ErrorKind::NotFound)]);
    let config = RunConfig::new().after(HookBuilder::new(&counter).callback_ok());

    let events = collect_events(Orchestrator::new(spawner).run(config)).await;

    assert_eq!(events.len(), 1, "{events:?}");
    match &events[0] {
        LifecycleEvent::Error(err @ RunError::Spawn(io_err)) => {
            assert_eq!(io_err.kind(), io::ErrorKind::NotFound);
            assert!(err.is_pre_spawn());
        }
        other => panic!("expected spawn error, got {other:?}"),
    }
    assert_eq!(counter.get(), 0);
}

#[tokio::test]
async fn failing_to_observe_exit_is_an_error_after_start() {
    init_tracing();

    let spawner = FakeSpawner::with_script([FakeProcess::fails_to_wait(io::ErrorKind::Other)]);
    let events = collect_events(Orchestrator::new(spawner).run(RunConfig::new())).await;

    assert_eq!(events.len(), 2, "{events:?}");
    assert!(matches!(events[0], LifecycleEvent::Start(_)));
    assert!(matches!(events[1], LifecycleEvent::Error(RunError::Wait(_))));
}

#[tokio::test]
async fn exit_without_code_or_signal_reports_minus_one() {
    init_tracing();

    let spawner = FakeSpawner::with_script([FakeProcess::with_exit(FakeExit::Immediate(
        ProcessExit::default(),
    ))]);
    let events = collect_events(Orchestrator::new(spawner).run(RunConfig::new())).await;

    assert!(matches!(events[1], LifecycleEvent::End(-1)), "{events:?}");
}

#[tokio::test]
async fn hooks_are_called_exactly_once_on_every_path() {
    init_tracing();

    let scripts: Vec<(&str, FakeProcess, usize)> = vec![
        ("exit 0", FakeProcess::exits(0), 1),
        ("exit 1", FakeProcess::exits(1), 1),
        ("signal", FakeProcess::killed_by("SIGKILL"), 0),
    ];

    for (label, process, expected_after) in scripts {
        let before = CallCounter::new();
        let after = CallCounter::new();
        let config = RunConfig::new()
            .before(HookBuilder::new(&before).callback_ok())
            .after(HookBuilder::new(&after).awaitable_err("after"));

        collect_events(Orchestrator::new(FakeSpawner::with_script([process])).run(config)).await;

        assert_eq!(before.get(), 1, "{label}");
        assert_eq!(after.get(), expected_after, "{label}");
    }
}

#[tokio::test]
async fn concurrent_runs_are_independent() {
    init_tracing();

    let spawner = FakeSpawner::new();
    let (slow, slow_exit) = FakeProcess::gated();
    spawner.push(slow);
    spawner.push(FakeProcess::exits(2));
    let orchestrator = Orchestrator::new(spawner.clone());

    let mut first = orchestrator.run(RunConfig::new().files(["slow.t"]));
    let first_start = with_timeout(first.next_event()).await;
    assert!(matches!(first_start, Some(LifecycleEvent::Start(_))));

    let second = orchestrator.run(RunConfig::new().files(["fast.t"]));
    let second_events = collect_events(second).await;
    assert!(matches!(second_events[1], LifecycleEvent::End(2)));

    slow_exit.send(ProcessExit::exited(5)).unwrap();
    let first_end = with_timeout(first.next_event()).await;
    assert!(matches!(first_end, Some(LifecycleEvent::End(5))), "{first_end:?}");
    assert_eq!(spawner.spawn_count(), 2);
}

#[tokio::test]
async fn wait_delivers_child_to_callback_and_returns_exit_code() {
    init_tracing();

    let spawner = FakeSpawner::with_script([FakeProcess::exits(4)]);
    let mut saw_child = false;

    let outcome = with_timeout(
        Orchestrator::new(spawner)
            .run(RunConfig::new())
            .wait(|child| saw_child = child.stdout.is_some()),
    )
    .await;

    assert_eq!(outcome.unwrap(), 4);
    assert!(saw_child);
}

#[tokio::test]
async fn wait_returns_the_run_error() {
    init_tracing();

    let counter = CallCounter::new();
    let config = RunConfig::new().before(HookBuilder::new(&counter).throws("nope"));

    let outcome = with_timeout(
        Orchestrator::new(FakeSpawner::new())
            .run(config)
            .wait(|_| panic!("start must not be delivered")),
    )
    .await;

    let err = outcome.unwrap_err();
    assert!(matches!(err, RunError::BeforeHook(_)));
    expect_hook_error(&err, "nope");
}

#[tokio::test]
async fn run_completes_even_if_handle_is_dropped() {
    init_tracing();

    let (done_tx, done_rx) = tokio::sync::oneshot::channel::<()>();
    let after = hooks::from_fn(move |done| {
        let _ = done_tx.send(());
        done.succeed();
        Ok(HookReturn::Pending)
    });

    let handle = Orchestrator::new(FakeSpawner::new()).run(RunConfig::new().after(after));
    drop(handle);

    with_timeout(done_rx).await.expect("after hook ran");
}

#[tokio::test]
async fn panicking_before_hook_still_emits_a_terminal_error() {
    init_tracing();

    let spawner = FakeSpawner::new();
    let before = hooks::from_fn(|_done| panic!("user hook bug"));
    let config = RunConfig::new().before(before);
    let events = collect_events(Orchestrator::new(spawner.clone()).run(config)).await;

    assert_eq!(events.len(), 1, "events: {events:?}");
    match &events[0] {
        LifecycleEvent::Error(RunError::BeforeHook(err)) => {
            let panicked = err
                .downcast_ref::<HookPanicked>()
                .expect("panic carried as hook error");
            assert_eq!(panicked.0, "user hook bug");
        }
        other => panic!("expected before-hook error, got {other:?}"),
    }
    assert_eq!(spawner.spawn_count(), 0);
}

#[tokio::test]
async fn panicking_after_hook_replaces_end_with_error() {
    init_tracing();

    let explode = true;
    let after = hooks::from_fn(move |_done| {
        Ok(HookReturn::awaitable(async move {
            if explode {
                panic!("teardown exploded");
            }
            Ok(())
        }))
    });
    let spawner = FakeSpawner::with_script([FakeProcess::exits(0)]);
    let config = RunConfig::new().after(after);
    let events = collect_events(Orchestrator::new(spawner).run(config)).await;

    assert_eq!(events.len(), 2, "events: {events:?}");
    assert!(matches!(events[0], LifecycleEvent::Start(_)));
    match &events[1] {
        LifecycleEvent::Error(RunError::AfterHook(err)) => {
            assert!(err.downcast_ref::<HookPanicked>().is_some(), "{err:?}");
        }
        other => panic!("expected after-hook error, got {other:?}"),
    }
}
