// src/config/model.rs

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [run]
/// exec = "node"
/// num_processes = 4
/// files = ["t/*.js"]
/// before = "./scripts/start-grid.sh"
/// after = "./scripts/stop-grid.sh"
/// hook_timeout_secs = 60
/// prove = "prove"
/// ```
///
/// Every key is optional; CLI flags override whatever is set here.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub run: RunSection,
}

/// `[run]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RunSection {
    /// Value passed to `prove --exec`.
    #[serde(default)]
    pub exec: Option<String>,

    /// Value passed to `prove --jobs`. Must be >= 1.
    #[serde(default)]
    pub num_processes: Option<u32>,

    /// Files or globs passed to `prove` as positional arguments.
    #[serde(default)]
    pub files: Vec<String>,

    /// Shell command run before `prove` starts.
    #[serde(default)]
    pub before: Option<String>,

    /// Shell command run after `prove` exits.
    #[serde(default)]
    pub after: Option<String>,

    /// Fail a hook that has not finished after this many seconds.
    #[serde(default)]
    pub hook_timeout_secs: Option<u64>,

    /// Path to the runner binary.
    #[serde(default)]
    pub prove: Option<String>,
}

/// Validated, fully defaulted settings for one run.
///
/// Plain data only; [`RunConfig::from_settings`](super::RunConfig::from_settings)
/// turns the hook commands into runnable hooks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSettings {
    pub exec: String,
    pub num_processes: u32,
    pub files: Vec<String>,
    pub before: Option<String>,
    pub after: Option<String>,
    pub hook_timeout: Option<Duration>,
    pub program: PathBuf,
}
