//! Batch negotiation: one target format, many files, per-file results.

use tracing::{info, warn};

use crate::error::NegotiationError;
use crate::negotiator::{ConversionResult, Negotiator};

/// Hard cap on files per batch.
pub const MAX_BATCH_FILES: usize = 50;

#[derive(Debug, Clone)]
pub struct BatchFile {
    pub filename: String,
    pub data: Vec<u8>,
}

/// Result for one file of a batch. A failed item never affects the others.
#[derive(Debug)]
pub struct BatchOutcome {
    pub filename: String,
    pub result: Result<ConversionResult, NegotiationError>,
}

impl Negotiator {
    /// Negotiates every file against the target named by `token`, in order.
    ///
    /// The token and the file count (at most `limit`, itself capped at
    /// [`MAX_BATCH_FILES`]) are checked once, before any file is inspected.
    pub fn negotiate_batch(
        &self,
        files: Vec<BatchFile>,
        token: &str,
        limit: usize,
    ) -> Result<Vec<BatchOutcome>, NegotiationError> {
        let target = Self::parse_target(token)?;
        let limit = limit.min(MAX_BATCH_FILES);
        if files.len() > limit {
            return Err(NegotiationError::TooManyFiles {
                count: files.len(),
                limit,
            });
        }

        let total = files.len();
        let outcomes: Vec<BatchOutcome> = files
            .into_iter()
            .map(|file| {
                let result = self.negotiate_format(file.data, target);
                if let Err(err) = &result {
                    warn!(filename = %file.filename, error = %err, "batch item failed");
                }
                BatchOutcome {
                    filename: file.filename,
                    result,
                }
            })
            .collect();

        let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
        info!(total, failed, target = %target, "batch negotiated");
        Ok(outcomes)
    }
}
