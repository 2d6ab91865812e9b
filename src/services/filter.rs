//! External region filter
//!
//! The region and the typed script are written to scratch files, a shell
//! command transforms them, and the result file is read back whole. The
//! caller only mutates the buffer once `run` has returned the full output.

use anyhow::{bail, Context};
use std::path::PathBuf;
use std::process::{Command, Stdio};

/// Transforms a region's bytes with a user-supplied script
pub trait RegionFilter {
    fn run(&self, script: &[u8], input: &[u8]) -> anyhow::Result<Vec<u8>>;
}

/// Runs a configured command under `sh -c`.
///
/// The command sees `SCRIPT`, `INPUT`, `OUTPUT` and `ERROR` in its environment,
/// each naming a file in a fresh scratch directory.
#[derive(Debug, Clone)]
pub struct ShellFilter {
    command: String,
    temp_dir: Option<PathBuf>,
}

impl ShellFilter {
    pub fn new(command: impl Into<String>, temp_dir: Option<PathBuf>) -> Self {
        Self {
            command: command.into(),
            temp_dir,
        }
    }
}

impl RegionFilter for ShellFilter {
    fn run(&self, script: &[u8], input: &[u8]) -> anyhow::Result<Vec<u8>> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("gapedit-filter");
        let scratch = match &self.temp_dir {
            Some(dir) => builder.tempdir_in(dir),
            None => builder.tempdir(),
        }
        .context("Failed to create filter scratch directory")?;

        let script_path = scratch.path().join("script");
        let input_path = scratch.path().join("input");
        let output_path = scratch.path().join("output");
        let error_path = scratch.path().join("error");
        std::fs::write(&script_path, script).context("Failed to write filter script")?;
        std::fs::write(&input_path, input).context("Failed to write filter input")?;

        tracing::debug!("Running filter: {}", self.command);
        let status = Command::new("sh")
            .arg("-c")
            .arg(&self.command)
            .env("SCRIPT", &script_path)
            .env("INPUT", &input_path)
            .env("OUTPUT", &output_path)
            .env("ERROR", &error_path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .context("Failed to start filter")?;

        if !status.success() {
            let message = std::fs::read_to_string(&error_path).unwrap_or_default();
            bail!("Filter failed ({}): {}", status, message.trim());
        }

        std::fs::read(&output_path).context("Failed to read filter output")
    }
}
