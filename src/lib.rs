// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod hooks;
pub mod logging;
pub mod types;

use anyhow::Result;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::{RunConfig, RunSettings, resolve_settings};
use crate::engine::Orchestrator;
use crate::exec::{OutputRelay, ProcessSpawner, ProveSpawner};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config resolution (file + CLI flags)
/// - the orchestrator with the real `prove` spawner
/// - relaying the runner's output to our stdout/stderr
///
/// Returns the exit code the process should end with. Run failures come
/// back as `Err`, which `main` reports and turns into exit status 1.
pub async fn run(args: CliArgs) -> Result<i32> {
    let settings = resolve_settings(&args)?;

    if args.dry_run {
        print_dry_run(&settings);
        return Ok(0);
    }

    let config = RunConfig::from_settings(settings);
    info!(?config, "starting run");

    let orchestrator = Orchestrator::new(ProveSpawner);
    run_to_completion(&orchestrator, config).await
}

/// Run one orchestration, relaying the runner's output while it runs.
///
/// Waits for both output streams to drain before returning, so nothing the
/// runner printed is lost when the caller exits.
pub async fn run_to_completion<S>(orchestrator: &Orchestrator<S>, config: RunConfig) -> Result<i32>
where
    S: ProcessSpawner + 'static,
{
    let mut relay = None;

    let outcome = orchestrator
        .run(config)
        .wait(|child| relay = Some(OutputRelay::attach(child)))
        .await;

    if let Some(relay) = relay {
        relay.finish().await;
    }

    Ok(outcome?)
}

/// Simple dry-run output: print the resolved invocation and hooks.
fn print_dry_run(settings: &RunSettings) {
    let config = RunConfig::from_settings(settings.clone());

    println!("proving-ground dry-run");
    println!("  command: {}", config.invocation());
    match &settings.before {
        Some(cmd) => println!("  before: {cmd}"),
        None => println!("  before: (none)"),
    }
    match &settings.after {
        Some(cmd) => println!("  after: {cmd}"),
        None => println!("  after: (none)"),
    }
    if let Some(limit) = settings.hook_timeout {
        println!("  hook_timeout: {}s", limit.as_secs());
    }

    debug!("dry-run complete (no execution)");
}
