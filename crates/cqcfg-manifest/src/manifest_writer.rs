//! Manifest writer utilities
//!
//! Thin logging wrappers around the [`Manifest`] persistence methods, used by
//! the CLI and by tests that need to read a written manifest back.

use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::errors::ManifestError;
use crate::types::Manifest;

/// Write manifest to `output_path`, replacing any previous file
pub fn write_to_path(manifest: &Manifest, output_path: &Path) -> Result<(), ManifestError> {
    debug!("Writing manifest to: {:?}", output_path);

    manifest.save_to_path(output_path)?;

    info!("Manifest written successfully to: {:?}", output_path);
    info!(
        "Permissions: {}, events: {}",
        manifest.auth.len(),
        manifest.event.len()
    );

    Ok(())
}

/// Read manifest from `manifest_path`
pub fn read_from_path(manifest_path: &Path) -> Result<Manifest, ManifestError> {
    debug!("Reading manifest from: {:?}", manifest_path);

    let content = fs::read(manifest_path)?;
    let manifest = Manifest::from_json_slice(&content)?;

    info!("Manifest loaded: {} {}", manifest.name, manifest.version);

    Ok(manifest)
}
