//! Format negotiation for fontshift.
//!
//! Given uploaded bytes and a target token (`ttf`, `otf`, `woff`, `woff2`),
//! the [`Negotiator`] decides whether the upload can be returned as-is or has
//! to go through a [`FontConverter`].

pub mod batch;
pub mod converter;
pub mod error;
pub mod format;
pub mod negotiator;

pub use batch::{BatchFile, BatchOutcome, MAX_BATCH_FILES};
pub use converter::{CodecConverter, Detected, FontConverter};
pub use error::{ConverterError, NegotiationError};
pub use format::FontFormat;
pub use negotiator::{ConversionResult, Negotiator, Outcome};
