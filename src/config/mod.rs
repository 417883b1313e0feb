// src/config/mod.rs

//! Configuration for proving-ground.
//!
//! - `model.rs`: the TOML-backed data model and validated [`RunSettings`].
//! - `loader.rs`: reading a config file and merging CLI flags over it.
//! - `validate.rs`: semantic checks (`num_processes >= 1`, non-empty values).
//! - `run_config.rs`: [`RunConfig`], the value the orchestrator consumes.

pub mod loader;
pub mod model;
pub mod run_config;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path, resolve_settings};
pub use model::{RawConfigFile, RunSection, RunSettings};
pub use run_config::{DEFAULT_EXEC, DEFAULT_NUM_PROCESSES, RunConfig};
pub use validate::validate_run_section;
