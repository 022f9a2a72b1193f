//! Centralized error types for cqcfg
//!
//! Every failure of a run ends up as a [`CliError`]; the binary reports it and
//! exits with status 1. Usage errors are reported by clap before a run starts.

use cqcfg_ast::ScanError;
use cqcfg_config::ConfigError;
use cqcfg_manifest::ManifestError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors from the revision-count query
#[derive(Error, Debug)]
pub enum RevisionError {
    #[error("{0}")]
    Locate(#[from] ConfigError),

    #[error("Failed to execute git: {0}")]
    Spawn(#[source] io::Error),

    #[error("git rev-list failed (exit {status:?}): {stderr}")]
    Failed { status: Option<i32>, stderr: String },

    #[error("Unexpected git rev-list output: {0:?}")]
    InvalidOutput(String),
}

/// Errors that abort a cqcfg run
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error("Revision count failed: {0}")]
    Revision(#[from] RevisionError),

    #[error("Manifest error: {0}")]
    Manifest(#[from] ManifestError),

    #[error("{} is out of date, run cqcfg without --check", .0.display())]
    Stale(PathBuf),
}
