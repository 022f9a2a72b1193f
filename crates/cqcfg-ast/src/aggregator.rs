//! Accumulates scanner findings across every file of a tree

use cqcfg_manifest::ScanOutput;
use std::sync::Arc;
use tracing::debug;

use crate::errors::MetadataError;
use crate::metadata::MetadataExtractor;
use crate::scanner::{AssignedExpr, ScanVisitor};

/// Single-writer sink for scan events
///
/// Identity and event assignments are last-write-wins in the order the
/// events are fed in.
pub struct Aggregator {
    identity_field: String,
    extractor: MetadataExtractor,
    marker_lines: Vec<String>,
    output: ScanOutput,
}

impl Aggregator {
    pub fn new(identity_field: impl Into<String>, marker_prefix: impl Into<String>) -> Self {
        Aggregator {
            identity_field: identity_field.into(),
            extractor: MetadataExtractor::new(marker_prefix),
            marker_lines: Vec::new(),
            output: ScanOutput::default(),
        }
    }

    /// Parse the collected marker lines and return the aggregated output
    pub fn finish(self) -> Result<ScanOutput, MetadataError> {
        let mut output = self.output;
        output.metadata = self.extractor.extract(&self.marker_lines)?;
        Ok(output)
    }
}

impl ScanVisitor for Aggregator {
    fn on_marker_comment(&mut self, text: &str) {
        if self.extractor.is_marker(text) {
            self.marker_lines.push(text.to_string());
        }
    }

    fn on_call(&mut self, member: &str) {
        *self.output.calls.entry(Arc::from(member)).or_insert(0) += 1;
    }

    fn on_assign(&mut self, field: &str, rhs: &AssignedExpr) {
        if field == self.identity_field {
            match rhs.string_literal {
                Some(ref id) => self.output.identity = Some(id.clone()),
                None => debug!(
                    "Ignoring {} assignment from non-literal `{}`",
                    field, rhs.text
                ),
            }
            return;
        }
        self.output
            .events
            .insert(Arc::from(field), rhs.text.clone());
    }
}
