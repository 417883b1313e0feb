// src/exec/invocation.rs

use std::fmt;
use std::path::{Path, PathBuf};

/// Binary used when no runner path is configured.
pub const DEFAULT_PROGRAM: &str = "prove";

/// A fully resolved `prove` command line.
///
/// Arguments are always laid out as
/// `--exec <exec> --jobs <jobs> <files...>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProveInvocation {
    program: PathBuf,
    args: Vec<String>,
}

impl ProveInvocation {
    pub fn new(program: impl Into<PathBuf>, exec: &str, jobs: u32, files: &[String]) -> Self {
        let mut args = Vec::with_capacity(4 + files.len());
        args.push("--exec".to_string());
        args.push(exec.to_string());
        args.push("--jobs".to_string());
        args.push(jobs.to_string());
        args.extend(files.iter().cloned());

        Self {
            program: program.into(),
            args,
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl fmt::Display for ProveInvocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " {arg:?}")?;
            } else {
                write!(f, " {arg}")?;
            }
        }
        Ok(())
    }
}
