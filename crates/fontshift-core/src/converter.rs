//! The seam between negotiation and byte-level transcoding.

use fontshift_codec::{Container, Flavor};

use crate::error::ConverterError;
use crate::format::FontFormat;

/// What detection found: the container and the outline flavor inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Detected {
    pub container: Container,
    pub flavor: Flavor,
}

impl Detected {
    /// The token reported back to clients as the input format. Bare SFNT
    /// fonts are labelled by flavor: `otf` for CFF outlines, `ttf` otherwise.
    pub fn label(&self) -> FontFormat {
        match (self.container, self.flavor) {
            (Container::Sfnt, Flavor::Cff) => FontFormat::Otf,
            (Container::Sfnt, Flavor::TrueType) => FontFormat::Ttf,
            (Container::Woff, _) => FontFormat::Woff,
            (Container::Woff2, _) => FontFormat::Woff2,
        }
    }
}

/// Detects and transcodes font containers.
///
/// Implementations are synchronous and CPU-bound; async callers run them on
/// a blocking thread.
pub trait FontConverter: Send + Sync {
    fn detect_format(&self, data: &[u8]) -> Result<Detected, ConverterError>;

    fn convert(&self, data: &[u8], target: Container) -> Result<Vec<u8>, ConverterError>;
}

/// [`FontConverter`] backed by `fontshift-codec`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CodecConverter;

impl FontConverter for CodecConverter {
    fn detect_format(&self, data: &[u8]) -> Result<Detected, ConverterError> {
        Ok(Detected {
            container: fontshift_codec::detect(data)?,
            flavor: fontshift_codec::detect_flavor(data)?,
        })
    }

    fn convert(&self, data: &[u8], target: Container) -> Result<Vec<u8>, ConverterError> {
        Ok(fontshift_codec::convert(data, target)?)
    }
}
