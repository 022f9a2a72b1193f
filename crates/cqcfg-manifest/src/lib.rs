//! cqcfg manifest types
//!
//! This crate holds the data the scanner aggregates (`ScanOutput`) and the
//! `app.json` document synthesized from it. The manifest is the declarative
//! mirror of what a CoolQ Go plugin does at initialization: the API members it
//! calls become permissions, the SDK callbacks it assigns become event
//! registrations.

pub mod errors;
pub mod manifest;
pub mod manifest_writer;
pub mod types;

pub use types::{
    CallTally, EventRegistration, EventTable, Manifest, Metadata, PluginVersion, ScanOutput,
};

pub use errors::ManifestError;

pub use manifest_writer::{read_from_path, write_to_path};
