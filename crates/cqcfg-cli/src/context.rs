//! Per-run context threaded through every pipeline stage

use cqcfg_config::ScanConfig;
use std::path::{Path, PathBuf};

use crate::errors::CliError;

/// Everything one invocation needs, built once by the driver
#[derive(Debug, Clone)]
pub struct RunContext {
    /// Go package directory to scan
    pub target_dir: PathBuf,
    /// Directory receiving the manifest
    pub output_dir: PathBuf,
    pub config: ScanConfig,
    /// Add the repository's commit count to the sequence number
    pub count_commits: bool,
    /// Compare against the existing manifest instead of writing
    pub check: bool,
}

impl RunContext {
    /// Build a context, loading the config that applies to `target_dir`
    pub fn load(
        target_dir: &Path,
        output_dir: Option<&Path>,
        count_commits: bool,
        check: bool,
    ) -> Result<Self, CliError> {
        let config = ScanConfig::load_for(target_dir)?;
        let output_dir = match output_dir {
            Some(dir) => dir.to_path_buf(),
            None => PathBuf::from("."),
        };
        Ok(RunContext {
            target_dir: target_dir.to_path_buf(),
            output_dir,
            config,
            count_commits,
            check,
        })
    }

    /// Full path of the manifest file
    pub fn manifest_path(&self) -> PathBuf {
        self.output_dir.join(&self.config.manifest_name)
    }
}
