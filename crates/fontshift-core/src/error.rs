use fontshift_codec::CodecError;
use thiserror::Error;

/// Failures reported by a [`crate::FontConverter`].
#[derive(Debug, Error)]
pub enum ConverterError {
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// Raised by converters that are not backed by the codec.
    #[error("{0}")]
    Other(String),
}

/// Why a single negotiation or a batch could not produce a result.
#[derive(Debug, Error)]
pub enum NegotiationError {
    /// The requested token is not one of the supported formats.
    #[error("invalid target format '{0}'")]
    InvalidTargetFormat(String),

    /// The source bytes match no known container.
    #[error("could not detect font format")]
    DetectionFailed(#[source] ConverterError),

    /// The converter rejected the source; the message is passed through.
    #[error("{0}")]
    ConversionFailed(#[source] ConverterError),

    #[error("too many files: {count} exceeds the limit of {limit}")]
    TooManyFiles { count: usize, limit: usize },
}
