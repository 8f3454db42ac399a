//! Container detection from magic bytes.

use strum::{Display, EnumString};

use crate::error::{CodecError, Result};
use crate::io::Reader;
use crate::sfnt::{CFF_VERSION, COLLECTION_TAG, is_sfnt_version};

pub(crate) const WOFF_SIGNATURE: u32 = u32::from_be_bytes(*b"wOFF");
pub(crate) const WOFF2_SIGNATURE: u32 = u32::from_be_bytes(*b"wOF2");

/// Binary container of a font file.
///
/// `Sfnt` covers both `.ttf` and `.otf`; the container does not tell them
/// apart, see [`Flavor`] for that.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Container {
    /// Bare SFNT. Also parsed from `truetype`, the name some converters use
    /// as the SFNT target.
    #[strum(to_string = "sfnt", serialize = "truetype")]
    Sfnt,
    Woff,
    Woff2,
}

/// Outline technology inside an SFNT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Flavor {
    /// `glyf` outlines (`0x00010000` or `true`).
    TrueType,
    /// CFF outlines (`OTTO`).
    Cff,
}

impl Flavor {
    pub fn from_sfnt_version(version: u32) -> Self {
        if version == CFF_VERSION {
            Flavor::Cff
        } else {
            Flavor::TrueType
        }
    }
}

/// Classifies `data` by its signature without parsing further.
pub fn detect(data: &[u8]) -> Result<Container> {
    let signature = Reader::new(data, "signature")
        .read_u32()
        .map_err(|_| CodecError::UnknownFormat)?;
    match signature {
        WOFF_SIGNATURE => Ok(Container::Woff),
        WOFF2_SIGNATURE => Ok(Container::Woff2),
        COLLECTION_TAG => Err(CodecError::CollectionUnsupported),
        v if is_sfnt_version(v) => Ok(Container::Sfnt),
        _ => Err(CodecError::UnknownFormat),
    }
}

/// Reports the outline flavor recorded in the container header.
///
/// WOFF and WOFF2 both store the wrapped font's `sfntVersion` right after
/// the signature.
pub fn detect_flavor(data: &[u8]) -> Result<Flavor> {
    let container = detect(data)?;
    let mut reader = Reader::new(data, "container header");
    let version = match container {
        Container::Sfnt => reader.read_u32()?,
        Container::Woff | Container::Woff2 => {
            reader.skip(4)?;
            reader.read_u32()?
        }
    };
    if version == COLLECTION_TAG {
        return Err(CodecError::CollectionUnsupported);
    }
    Ok(Flavor::from_sfnt_version(version))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_each_signature() {
        assert_eq!(detect(b"wOFF\0\x01\0\0").unwrap(), Container::Woff);
        assert_eq!(detect(b"wOF2OTTO").unwrap(), Container::Woff2);
        assert_eq!(detect(&[0, 1, 0, 0, 0, 3]).unwrap(), Container::Sfnt);
        assert_eq!(detect(b"OTTO").unwrap(), Container::Sfnt);
        assert_eq!(detect(b"true").unwrap(), Container::Sfnt);
    }

    #[test]
    fn short_or_unknown_input_is_rejected() {
        assert!(matches!(detect(b""), Err(CodecError::UnknownFormat)));
        assert!(matches!(detect(b"wOF"), Err(CodecError::UnknownFormat)));
        assert!(matches!(detect(b"hello world"), Err(CodecError::UnknownFormat)));
        assert!(matches!(detect(b"ttcf\0\x02"), Err(CodecError::CollectionUnsupported)));
    }

    #[test]
    fn flavor_reads_wrapped_version() {
        assert_eq!(detect_flavor(b"OTTO").unwrap(), Flavor::Cff);
        assert_eq!(detect_flavor(&[0, 1, 0, 0]).unwrap(), Flavor::TrueType);
        assert_eq!(detect_flavor(b"wOFFOTTO").unwrap(), Flavor::Cff);
        assert_eq!(detect_flavor(b"wOF2\0\x01\0\0").unwrap(), Flavor::TrueType);
        assert!(detect_flavor(b"wOF2").is_err());
        assert!(matches!(
            detect_flavor(b"wOF2ttcf"),
            Err(CodecError::CollectionUnsupported)
        ));
    }

    #[test]
    fn container_names_parse_and_print() {
        assert_eq!(Container::Sfnt.to_string(), "sfnt");
        assert_eq!(Container::Woff2.to_string(), "woff2");
        assert_eq!("truetype".parse::<Container>().unwrap(), Container::Sfnt);
        assert_eq!("woff".parse::<Container>().unwrap(), Container::Woff);
        assert!("otf".parse::<Container>().is_err());
    }
}
