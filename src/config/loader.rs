// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::cli::CliArgs;
use crate::config::model::{RawConfigFile, RunSettings};
use crate::errors::Result;

/// Load a configuration file from a given path and return the raw `RawConfigFile`.
///
/// This only performs TOML deserialization; use [`load_and_validate`] to
/// also apply defaults and validation.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a configuration file from path, apply defaults and validate it.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<RunSettings> {
    let raw_config = load_from_path(&path)?;
    let settings = RunSettings::try_from(raw_config)?;
    Ok(settings)
}

/// Config file picked up from the working directory when `--config` is not
/// given.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("ProvingGround.toml")
}

/// Build the settings for one run from CLI flags and an optional file.
///
/// - An explicit `--config` must exist.
/// - Otherwise `ProvingGround.toml` is used if present.
/// - Flags given on the CLI override the file; positional files replace the
///   file's list rather than extending it.
pub fn resolve_settings(args: &CliArgs) -> Result<RunSettings> {
    let mut raw = match &args.config {
        Some(path) => load_from_path(path)?,
        None => {
            let path = default_config_path();
            if path.is_file() {
                debug!(path = %path.display(), "using default config file");
                load_from_path(&path)?
            } else {
                RawConfigFile::default()
            }
        }
    };

    apply_cli_overrides(&mut raw, args);
    RunSettings::try_from(raw)
}

fn apply_cli_overrides(raw: &mut RawConfigFile, args: &CliArgs) {
    let run = &mut raw.run;

    if let Some(exec) = &args.exec {
        run.exec = Some(exec.clone());
    }
    if let Some(n) = args.num_processes {
        run.num_processes = Some(n);
    }
    if !args.files.is_empty() {
        run.files = args.files.clone();
    }
    if let Some(before) = &args.before {
        run.before = Some(before.clone());
    }
    if let Some(after) = &args.after {
        run.after = Some(after.clone());
    }
    if let Some(secs) = args.hook_timeout {
        run.hook_timeout_secs = Some(secs);
    }
    if let Some(prove) = &args.prove {
        run.prove = Some(prove.clone());
    }
}
