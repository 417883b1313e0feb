// src/config/validate.rs

use std::path::PathBuf;
use std::time::Duration;

use crate::config::model::{RawConfigFile, RunSection, RunSettings};
use crate::config::run_config::{DEFAULT_EXEC, DEFAULT_NUM_PROCESSES};
use crate::errors::{ProvingGroundError, Result};
use crate::exec::DEFAULT_PROGRAM;

impl TryFrom<RawConfigFile> for RunSettings {
    type Error = ProvingGroundError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_run_section(&raw.run)?;

        let run = raw.run;
        Ok(RunSettings {
            exec: run.exec.unwrap_or_else(|| DEFAULT_EXEC.to_string()),
            num_processes: run.num_processes.unwrap_or(DEFAULT_NUM_PROCESSES),
            files: run.files,
            before: run.before,
            after: run.after,
            hook_timeout: run.hook_timeout_secs.map(Duration::from_secs),
            program: PathBuf::from(run.prove.as_deref().unwrap_or(DEFAULT_PROGRAM)),
        })
    }
}

/// Validate a `[run]` section after CLI overrides have been applied.
pub fn validate_run_section(run: &RunSection) -> Result<()> {
    validate_exec(run)?;
    validate_num_processes(run)?;
    validate_files(run)?;
    validate_hooks(run)?;
    validate_program(run)?;
    Ok(())
}

fn validate_exec(run: &RunSection) -> Result<()> {
    if let Some(exec) = &run.exec {
        if exec.trim().is_empty() {
            return Err(ProvingGroundError::ConfigError(
                "[run].exec must not be empty".to_string(),
            ));
        }
    }
    Ok(())
}

fn validate_num_processes(run: &RunSection) -> Result<()> {
    if run.num_processes == Some(0) {
        return Err(ProvingGroundError::ConfigError(
            "[run].num_processes must be >= 1 (got 0)".to_string(),
        ));
    }
    Ok(())
}

fn validate_files(run: &RunSection) -> Result<()> {
    if let Some(idx) = run.files.iter().position(|f| f.trim().is_empty()) {
        return Err(ProvingGroundError::ConfigError(format!(
            "[run].files[{idx}] must not be empty"
        )));
    }
    Ok(())
}

fn validate_hooks(run: &RunSection) -> Result<()> {
    for (key, value) in [("before", &run.before), ("after", &run.after)] {
        if let Some(cmd) = value {
            if cmd.trim().is_empty() {
                return Err(ProvingGroundError::ConfigError(format!(
                    "[run].{key} must not be an empty command"
                )));
            }
        }
    }

    if run.hook_timeout_secs == Some(0) {
        return Err(ProvingGroundError::ConfigError(
            "[run].hook_timeout_secs must be >= 1 (got 0)".to_string(),
        ));
    }

    Ok(())
}

fn validate_program(run: &RunSection) -> Result<()> {
    if let Some(prove) = &run.prove {
        if prove.trim().is_empty() {
            return Err(ProvingGroundError::ConfigError(
                "[run].prove must not be empty".to_string(),
            ));
        }
    }
    Ok(())
}
