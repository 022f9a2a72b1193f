//! Manifest synthesis and persistence
//!
//! Turns a [`ScanOutput`] into a [`Manifest`] with a deterministic layout and
//! writes it as tab-indented JSON.

use crate::errors::ManifestError;
use crate::types::{EventRegistration, Manifest, ScanOutput};
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

impl Manifest {
    /// Build the manifest for a scanned tree
    ///
    /// `revisions` is added to the declared sequence number when revision
    /// counting was requested.
    pub fn synthesize(scan: &ScanOutput, revisions: Option<u64>) -> Result<Self, ManifestError> {
        let metadata = &scan.metadata;
        let declared = metadata.version.sequence;
        let version_id = match revisions {
            Some(count) => {
                declared
                    .checked_add(count)
                    .ok_or(ManifestError::SequenceOverflow {
                        sequence: declared,
                        revisions: count,
                    })?
            }
            None => declared,
        };

        let mut auth: Vec<Arc<str>> = scan
            .calls
            .iter()
            .filter(|&(_, &count)| count > 0)
            .map(|(name, _)| name.clone())
            .collect();
        auth.sort_unstable();

        let mut event: Vec<EventRegistration> = scan
            .events
            .iter()
            .map(|(name, function)| EventRegistration {
                name: name.clone(),
                function: function.clone(),
            })
            .collect();
        event.sort_unstable_by(|a, b| a.name.cmp(&b.name));

        debug!(
            "Synthesized manifest: {} permissions, {} events, version_id {}",
            auth.len(),
            event.len(),
            version_id
        );

        Ok(Manifest {
            name: metadata.name.clone(),
            version: metadata.version.semver(),
            version_id,
            author: metadata.author.clone(),
            description: metadata.description.clone(),
            appid: scan.identity.as_deref().unwrap_or_default().to_string(),
            event,
            auth,
        })
    }

    /// Render as tab-indented JSON with a trailing newline
    pub fn to_json_bytes(&self) -> Result<Vec<u8>, ManifestError> {
        let mut buf = Vec::with_capacity(1024);
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut serializer)
            .map_err(ManifestError::Serialize)?;
        buf.push(b'\n');
        Ok(buf)
    }

    /// Parse a manifest previously written by [`Manifest::save_to_path`]
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, ManifestError> {
        serde_json::from_slice(bytes).map_err(ManifestError::Parse)
    }

    /// Save manifest to a specific path with atomic write
    ///
    /// The content is written to a sibling temp file and renamed over the
    /// target, so readers never observe a half-written manifest.
    pub fn save_to_path(&self, path: &Path) -> Result<(), ManifestError> {
        let content = self.to_json_bytes()?;

        let temp_path = path.with_extension("json.tmp");
        let written = (|| -> std::io::Result<()> {
            let file = std::fs::File::create(&temp_path)?;
            let mut writer = std::io::BufWriter::new(file);
            writer.write_all(&content)?;
            writer.flush()?;
            writer.get_ref().sync_all()?;
            Ok(())
        })();

        if let Err(e) = written {
            let _ = std::fs::remove_file(&temp_path);
            return Err(ManifestError::Io(e));
        }

        std::fs::rename(&temp_path, path)?;
        Ok(())
    }

    /// Whether `path` already holds exactly this manifest's serialization
    pub fn is_current_at(&self, path: &Path) -> Result<bool, ManifestError> {
        if !path.exists() {
            return Ok(false);
        }
        let existing = std::fs::read(path)?;
        Ok(existing == self.to_json_bytes()?)
    }
}
