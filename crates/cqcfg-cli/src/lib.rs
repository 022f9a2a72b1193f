//! cqcfg library - the manifest generation pipeline behind the binary
//!
//! Exposed so the driver can be exercised without spawning the CLI.

pub mod commands;
pub mod common;
pub mod context;
pub mod errors;
pub mod revision;

pub use common::GlobalOpts;
pub use context::RunContext;
pub use errors::CliError;
