//! Common types and utilities shared across modules

use clap::Parser;

/// Global CLI options controlling diagnostics
#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalOpts {
    #[arg(short, long, help = "Only print errors")]
    pub quiet: bool,

    #[arg(long, action = clap::ArgAction::Count, help = "Increase verbosity (--verbose for debug, twice for trace)")]
    pub verbose: u8,

    #[arg(long, help = "Emit tracing output as JSON lines")]
    pub log_json: bool,
}

impl GlobalOpts {
    /// Get the effective verbosity level
    /// - 0: quiet/warn only
    /// - 1: debug (--verbose)
    /// - 2: trace (--verbose --verbose)
    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }
}
