//! Decides whether an upload needs converting and, if so, to what.

use std::sync::Arc;

use tracing::{debug, info};

use crate::converter::{CodecConverter, Detected, FontConverter};
use crate::error::NegotiationError;
use crate::format::FontFormat;

/// How a result was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Bare SFNT requested as `ttf` or `otf`; returned as uploaded.
    Equivalent,
    /// Already in the requested container; returned as uploaded.
    ExactMatch,
    /// Re-encoded by the converter.
    Converted,
}

#[derive(Debug, Clone)]
pub struct ConversionResult {
    pub data: Vec<u8>,
    pub outcome: Outcome,
    pub detected: Detected,
    pub output_format: FontFormat,
}

impl ConversionResult {
    pub fn converted(&self) -> bool {
        self.outcome == Outcome::Converted
    }

    pub fn input_format(&self) -> FontFormat {
        self.detected.label()
    }
}

/// Applies the format negotiation rules on top of a [`FontConverter`].
#[derive(Clone)]
pub struct Negotiator {
    converter: Arc<dyn FontConverter>,
}

impl std::fmt::Debug for Negotiator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Negotiator").finish_non_exhaustive()
    }
}

impl Default for Negotiator {
    fn default() -> Self {
        Self::new(Arc::new(CodecConverter))
    }
}

impl Negotiator {
    pub fn new(converter: Arc<dyn FontConverter>) -> Self {
        Self { converter }
    }

    /// Parses a client-supplied target token.
    pub fn parse_target(token: &str) -> Result<FontFormat, NegotiationError> {
        token
            .parse()
            .map_err(|_| NegotiationError::InvalidTargetFormat(token.to_owned()))
    }

    /// Negotiates `source` against the target named by `token`.
    ///
    /// The token is validated before the source is inspected.
    pub fn negotiate(&self, source: Vec<u8>, token: &str) -> Result<ConversionResult, NegotiationError> {
        let target = Self::parse_target(token)?;
        self.negotiate_format(source, target)
    }

    pub fn negotiate_format(
        &self,
        source: Vec<u8>,
        target: FontFormat,
    ) -> Result<ConversionResult, NegotiationError> {
        let detected = self
            .converter
            .detect_format(&source)
            .map_err(NegotiationError::DetectionFailed)?;
        debug!(
            container = %detected.container,
            flavor = %detected.flavor,
            target = %target,
            "detected source format"
        );

        let container = target.converter_target();
        let outcome = if detected.container == container && target.is_sfnt() {
            Outcome::Equivalent
        } else if detected.container == container {
            Outcome::ExactMatch
        } else {
            Outcome::Converted
        };

        let data = match outcome {
            Outcome::Equivalent | Outcome::ExactMatch => {
                debug!(?outcome, "source already in target format; returning original");
                source
            }
            Outcome::Converted => {
                let data = self
                    .converter
                    .convert(&source, container)
                    .map_err(NegotiationError::ConversionFailed)?;
                info!(
                    from = %detected.label(),
                    to = %target,
                    input_size = source.len(),
                    output_size = data.len(),
                    "converted font"
                );
                data
            }
        };

        Ok(ConversionResult {
            data,
            outcome,
            detected,
            output_format: target,
        })
    }
}
