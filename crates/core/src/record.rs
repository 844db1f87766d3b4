//! Replayable resolution records.
//!
//! A record captures everything needed to reproduce one template
//! resolution later or elsewhere: the template's fingerprint, the seed (if
//! one was requested), the flattened choice path, and the resolved text
//! for cross-checking.

use std::error::Error;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::template::{ResolveError, Template};

pub const RECORD_FORMAT_VERSION: u16 = 1;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionRecord {
    pub format_version: u16,
    pub template_fingerprint: u64,
    pub seed: Option<u64>,
    pub indices: Vec<usize>,
    pub resolved: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReplayError {
    /// The record was captured from a different template.
    TemplateMismatch,
    /// The index path no longer resolves (see the inner error).
    Resolve(ResolveError),
    /// The path resolved, but not to the recorded text.
    OutputMismatch,
}

impl fmt::Display for ReplayError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TemplateMismatch => {
                formatter.write_str("record was captured from a different template")
            }
            Self::Resolve(inner) => write!(formatter, "record does not replay: {inner}"),
            Self::OutputMismatch => {
                formatter.write_str("replayed text does not match the recorded text")
            }
        }
    }
}

impl Error for ReplayError {}

impl ResolutionRecord {
    /// Resolves the template once and records the outcome. A `Some` seed
    /// makes the capture reproducible from the record alone; `None` records
    /// an ambient resolution that can still be replayed through its
    /// indices.
    pub fn capture(template: &Template, seed: Option<u64>) -> Self {
        let (resolved, indices) = template.resolve(seed.map(Into::into));
        Self {
            format_version: RECORD_FORMAT_VERSION,
            template_fingerprint: template.fingerprint(),
            seed,
            indices: indices.flatten(),
            resolved,
        }
    }

    pub fn matches_template(&self, template: &Template) -> bool {
        self.template_fingerprint == template.fingerprint()
    }

    /// Replays the recorded path against `template`, verifying the
    /// fingerprint first and the resolved text afterwards.
    pub fn replay(&self, template: &Template) -> Result<String, ReplayError> {
        if !self.matches_template(template) {
            return Err(ReplayError::TemplateMismatch);
        }
        let replayed = template.select_variants(&self.indices).map_err(ReplayError::Resolve)?;
        if replayed != self.resolved {
            return Err(ReplayError::OutputMismatch);
        }
        Ok(replayed)
    }
}
