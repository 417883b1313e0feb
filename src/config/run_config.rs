// src/config/run_config.rs

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::model::RunSettings;
use crate::exec::{DEFAULT_PROGRAM, ProveInvocation};
use crate::hooks::{Hook, ShellHook};

/// `--exec` value used when none is configured.
pub const DEFAULT_EXEC: &str = "node";

/// `--jobs` value used when none is configured.
pub const DEFAULT_NUM_PROCESSES: u32 = 1;

/// Everything one orchestration run needs.
///
/// Built once with the consuming setters below and then handed to
/// [`Orchestrator::run`](crate::engine::Orchestrator::run), which consumes
/// it: hooks run at most once, so a `RunConfig` cannot be reused.
pub struct RunConfig {
    exec: String,
    num_processes: u32,
    files: Vec<String>,
    before: Option<Box<dyn Hook>>,
    after: Option<Box<dyn Hook>>,
    hook_timeout: Option<Duration>,
    program: PathBuf,
}

/// The pieces of a [`RunConfig`] the orchestrator works with.
pub(crate) struct RunParts {
    pub invocation: ProveInvocation,
    pub before: Option<Box<dyn Hook>>,
    pub after: Option<Box<dyn Hook>>,
    pub hook_timeout: Option<Duration>,
}

impl RunConfig {
    pub fn new() -> Self {
        Self {
            exec: DEFAULT_EXEC.to_string(),
            num_processes: DEFAULT_NUM_PROCESSES,
            files: Vec::new(),
            before: None,
            after: None,
            hook_timeout: None,
            program: PathBuf::from(DEFAULT_PROGRAM),
        }
    }

    /// Build a config from validated settings, wrapping hook commands in
    /// [`ShellHook`]s.
    pub fn from_settings(settings: RunSettings) -> Self {
        let mut config = Self::new()
            .exec(settings.exec)
            .num_processes(settings.num_processes)
            .files(settings.files)
            .program(settings.program);

        if let Some(cmd) = settings.before {
            config = config.before(ShellHook::new(cmd));
        }
        if let Some(cmd) = settings.after {
            config = config.after(ShellHook::new(cmd));
        }
        if let Some(limit) = settings.hook_timeout {
            config = config.hook_timeout(limit);
        }
        config
    }

    /// Command passed to `prove --exec`. An empty string keeps the default.
    pub fn exec(mut self, exec: impl Into<String>) -> Self {
        let exec = exec.into();
        if !exec.is_empty() {
            self.exec = exec;
        }
        self
    }

    /// Parallelism passed to `prove --jobs`. Zero keeps the default of 1.
    pub fn num_processes(mut self, n: u32) -> Self {
        if n > 0 {
            self.num_processes = n;
        }
        self
    }

    pub fn files<I, S>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.files = files.into_iter().map(Into::into).collect();
        self
    }

    pub fn before(mut self, hook: impl Hook + 'static) -> Self {
        self.before = Some(Box::new(hook));
        self
    }

    pub fn after(mut self, hook: impl Hook + 'static) -> Self {
        self.after = Some(Box::new(hook));
        self
    }

    pub fn hook_timeout(mut self, limit: Duration) -> Self {
        self.hook_timeout = Some(limit);
        self
    }

    /// Runner binary to spawn instead of `prove` from `PATH`.
    pub fn program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    pub fn exec_command(&self) -> &str {
        &self.exec
    }

    pub fn jobs(&self) -> u32 {
        self.num_processes
    }

    pub fn file_args(&self) -> &[String] {
        &self.files
    }

    pub fn has_before(&self) -> bool {
        self.before.is_some()
    }

    pub fn has_after(&self) -> bool {
        self.after.is_some()
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.hook_timeout
    }

    pub fn program_path(&self) -> &Path {
        &self.program
    }

    /// The `prove` command line this config produces.
    pub fn invocation(&self) -> ProveInvocation {
        ProveInvocation::new(&self.program, &self.exec, self.num_processes, &self.files)
    }

    pub(crate) fn into_parts(self) -> RunParts {
        let invocation = self.invocation();
        RunParts {
            invocation,
            before: self.before,
            after: self.after,
            hook_timeout: self.hook_timeout,
        }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RunConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunConfig")
            .field("exec", &self.exec)
            .field("num_processes", &self.num_processes)
            .field("files", &self.files)
            .field("before", &self.before.is_some())
            .field("after", &self.after.is_some())
            .field("hook_timeout", &self.hook_timeout)
            .field("program", &self.program)
            .finish()
    }
}
