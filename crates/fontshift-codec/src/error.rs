use thiserror::Error;

use crate::tag::Tag;

/// Errors returned by container detection and transcoding.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The leading bytes match none of the supported container signatures.
    #[error("unrecognized font container")]
    UnknownFormat,

    /// Font collections (`ttcf`) cannot be converted.
    #[error("font collections are not supported")]
    CollectionUnsupported,

    /// A read ran past the end of the buffer.
    #[error("unexpected end of data while reading {what}")]
    Truncated { what: &'static str },

    /// A structure was present but violated the container format.
    #[error("malformed {container} data: {message}")]
    Malformed {
        container: &'static str,
        message: String,
    },

    /// A WOFF2 table used a transform this decoder does not implement.
    #[error("unsupported transform version {version} for table '{tag}'")]
    UnsupportedTransform { tag: Tag, version: u8 },

    /// zlib or Brotli (de)compression failed.
    #[error("compression error: {0}")]
    Compression(#[from] std::io::Error),
}

impl CodecError {
    pub(crate) fn malformed(container: &'static str, message: impl Into<String>) -> Self {
        CodecError::Malformed {
            container,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CodecError>;
