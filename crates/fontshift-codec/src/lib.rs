//! Font container detection and lossless transcoding between bare SFNT
//! (TrueType/OpenType), WOFF 1.0 and WOFF 2.0.
//!
//! Every container decodes to a [`Font`], a table-level view of the SFNT,
//! and every container encodes from one. Outlines are never interpreted
//! beyond what the WOFF2 `glyf` transform needs.

mod error;
mod format;
mod io;
pub mod sfnt;
mod tag;
pub mod woff;
pub mod woff2;

#[cfg(test)]
mod fixtures;

use tracing::debug;

pub use error::{CodecError, Result};
pub use format::{Container, Flavor, detect, detect_flavor};
pub use sfnt::{Font, Table};
pub use tag::Tag;

/// Decodes any supported container into a [`Font`].
pub fn decode(data: &[u8]) -> Result<Font> {
    match detect(data)? {
        Container::Sfnt => Font::parse(data),
        Container::Woff => woff::decode(data),
        Container::Woff2 => woff2::decode(data),
    }
}

/// Serializes `font` into `container`.
pub fn encode(font: &Font, container: Container) -> Result<Vec<u8>> {
    match container {
        Container::Sfnt => Ok(font.to_sfnt()),
        Container::Woff => woff::encode(font),
        Container::Woff2 => woff2::encode(font),
    }
}

/// Re-encodes `data` into `target`, whatever container it arrived in.
pub fn convert(data: &[u8], target: Container) -> Result<Vec<u8>> {
    let font = decode(data)?;
    let out = encode(&font, target)?;
    debug!(
        target = %target,
        flavor = %font.flavor(),
        tables = font.tables().len(),
        input_size = data.len(),
        output_size = out.len(),
        "converted font"
    );
    Ok(out)
}
