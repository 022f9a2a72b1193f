//! Types shared between the scanner and the manifest synthesizer
//!
//! This module provides:
//! - `Metadata` / `PluginVersion` parsed from marker comments
//! - `ScanOutput`, the aggregated result of scanning a source tree
//! - `Manifest`, the serialized `app.json` document

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// API member name -> number of references found in source
pub type CallTally = AHashMap<Arc<str>, u32>;

/// Extension point name -> source text of the assigned handler expression
pub type EventTable = AHashMap<Arc<str>, Arc<str>>;

// =============================================================================
// METADATA - Populated from marker comments only
// =============================================================================

/// Plugin version declared as `<major>.<minor>.<patch>:<sequence>`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct PluginVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
    /// Monotonic build number the host uses to order releases
    pub sequence: u64,
}

impl PluginVersion {
    /// Semantic part only, e.g. `1.2.3`
    pub fn semver(&self) -> String {
        format!("{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl fmt::Display for PluginVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}:{}",
            self.major, self.minor, self.patch, self.sequence
        )
    }
}

/// Manifest metadata declared in marker comments
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    pub name: String,
    pub version: PluginVersion,
    pub author: String,
    pub description: String,
}

// =============================================================================
// SCAN OUTPUT - Everything the aggregator collected in one run
// =============================================================================

/// Aggregated findings for a whole source tree
#[derive(Debug, Clone, Default)]
pub struct ScanOutput {
    /// Plugin identity, last string-literal assignment wins
    pub identity: Option<Arc<str>>,
    pub metadata: Metadata,
    pub calls: CallTally,
    pub events: EventTable,
}

// =============================================================================
// MANIFEST - The app.json document
// =============================================================================

/// One registered event handler
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRegistration {
    /// Extension point assigned in source, e.g. `PrivateMsg`
    pub name: Arc<str>,
    /// Handler expression as written on the right-hand side
    pub function: Arc<str>,
}

/// Serialized plugin manifest
///
/// Field order is the on-disk key order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub name: String,
    pub version: String,
    pub version_id: u64,
    pub author: String,
    pub description: String,
    pub appid: String,
    #[serde(default)]
    pub event: Vec<EventRegistration>,
    /// Permission list: every API member referenced at least once
    #[serde(default)]
    pub auth: Vec<Arc<str>>,
}
