//! Revision counting for automatic sequence numbers
//!
//! With `-c`, the manifest's `version_id` is the declared sequence number plus
//! the number of commits recorded in the repository (all branches).

use cqcfg_config::ScanConfig;
use cqcfg_logger as logger;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::errors::RevisionError;

/// Source of the recorded-history size for a working tree
pub trait RevisionCounter {
    fn count(&self, dir: &Path) -> Result<u64, RevisionError>;
}

/// Counts commits with `git rev-list --all --count`
pub struct GitRevisionCounter {
    config: ScanConfig,
}

impl GitRevisionCounter {
    pub fn new(config: &ScanConfig) -> Self {
        GitRevisionCounter {
            config: config.clone(),
        }
    }

    fn git(&self) -> Result<PathBuf, RevisionError> {
        Ok(self.config.git_executable()?)
    }
}

impl RevisionCounter for GitRevisionCounter {
    fn count(&self, dir: &Path) -> Result<u64, RevisionError> {
        let git = self.git()?;

        let mut cmd = Command::new(&git);
        cmd.args(["rev-list", "--all", "--count"]).current_dir(dir);
        logger::debug(&format!("Running: {:?}", cmd));

        let output = cmd.output().map_err(RevisionError::Spawn)?;
        logger::capture_output("git rev-list --all --count", &output);

        if !output.status.success() {
            return Err(RevisionError::Failed {
                status: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        parse_count(&String::from_utf8_lossy(&output.stdout))
    }
}

fn parse_count(stdout: &str) -> Result<u64, RevisionError> {
    let trimmed = stdout.trim();
    trimmed
        .parse::<u64>()
        .map_err(|_| RevisionError::InvalidOutput(trimmed.to_string()))
}

/// Fixed count, for callers that already know the history size
pub struct FixedRevisionCount(pub u64);

impl RevisionCounter for FixedRevisionCount {
    fn count(&self, _dir: &Path) -> Result<u64, RevisionError> {
        Ok(self.0)
    }
}
