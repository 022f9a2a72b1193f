//! Static scanning of CoolQ Go plugins
//!
//! This crate builds the data behind `app.json` without compiling the plugin:
//! 1. Every `.go` file of the package directory is parsed with ast-grep (tree-sitter-go)
//! 2. Each file's SDK import alias is resolved
//! 3. Comments, SDK assignments and SDK references are classified per file
//! 4. The findings are folded into one [`ScanOutput`] in file-name order
//!
//! Files are parsed in parallel; aggregation is sequential so that
//! last-write-wins assignments are deterministic.
pub mod aggregator;
pub mod errors;
pub mod metadata;
pub mod namespace;
pub mod scanner;

use cqcfg_config::ScanConfig;
use cqcfg_logger as logger;
use cqcfg_manifest::ScanOutput;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub use aggregator::Aggregator;
pub use errors::{MetadataError, ScanError};
pub use scanner::{AssignedExpr, FileScan, ScanEvent, ScanVisitor};

/// Source tree scanning orchestrator
pub struct SourceScanner<'a> {
    config: &'a ScanConfig,
}

impl<'a> SourceScanner<'a> {
    pub fn new(config: &'a ScanConfig) -> Self {
        SourceScanner { config }
    }

    /// Scan the Go package in `dir` and aggregate the findings
    pub fn scan_tree(&self, dir: &Path) -> Result<ScanOutput, ScanError> {
        let start_time = std::time::Instant::now();
        logger::info(&format!("Scanning Go sources in: {}", dir.display()));

        let files = Self::collect_go_files(dir)?;
        logger::debug(&format!("Found {} Go files", files.len()));

        let scans = files
            .par_iter()
            .map(|path| self.scan_path(path))
            .collect::<Result<Vec<_>, _>>()?;

        let mut aggregator =
            Aggregator::new(&self.config.identity_field, self.config.marker_prefix());
        for scan in &scans {
            logger::step(&format!(
                "{}: alias {:?}, {} findings",
                scan.path.display(),
                scan.alias,
                scan.events.len()
            ));
            scan.replay(&mut aggregator);
        }
        let output = aggregator.finish()?;

        let elapsed = start_time.elapsed();
        logger::info(&format!(
            "Scan completed in {:.2}ms: {} API members, {} events",
            elapsed.as_secs_f64() * 1000.0,
            output.calls.len(),
            output.events.len()
        ));

        Ok(output)
    }

    /// Read and scan a single file
    pub fn scan_path(&self, path: &Path) -> Result<FileScan, ScanError> {
        let content = std::fs::read_to_string(path).map_err(|source| ScanError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        scanner::scan_file(
            path,
            &content,
            &self.config.sdk_path,
            &self.config.default_alias,
        )
    }

    /// `.go` files directly inside `dir`, sorted by file name
    fn collect_go_files(dir: &Path) -> Result<Vec<PathBuf>, ScanError> {
        if !dir.is_dir() {
            return Err(ScanError::MissingDirectory(dir.to_path_buf()));
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| ScanError::Io {
                path: dir.to_path_buf(),
                source: e.into(),
            })?;
            let path = entry.path();
            let is_go = path.extension().and_then(|s| s.to_str()) == Some("go");
            if entry.file_type().is_file() && is_go {
                files.push(path.to_path_buf());
            }
        }
        Ok(files)
    }
}
