//! User-facing font format tokens.

use std::path::Path;

use fontshift_codec::Container;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};
use utoipa::ToSchema;

/// A target or input format as named by API clients.
///
/// Tokens parse case-insensitively; `Display` always yields the lowercase
/// token.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
    Serialize,
    Deserialize,
    ToSchema,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum FontFormat {
    Woff,
    Woff2,
    Ttf,
    Otf,
}

impl FontFormat {
    /// Every token, in the order clients see them listed.
    pub fn supported() -> Vec<FontFormat> {
        FontFormat::iter().collect()
    }

    pub fn as_str(self) -> &'static str {
        self.into()
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            FontFormat::Woff => "font/woff",
            FontFormat::Woff2 => "font/woff2",
            FontFormat::Ttf => "font/ttf",
            FontFormat::Otf => "font/otf",
        }
    }

    /// File extension without the dot.
    pub fn extension(self) -> &'static str {
        self.as_str()
    }

    /// Both `ttf` and `otf` live in a bare SFNT container.
    pub fn is_sfnt(self) -> bool {
        matches!(self, FontFormat::Ttf | FontFormat::Otf)
    }

    /// The container the converter has to produce for this token.
    pub fn converter_target(self) -> Container {
        match self {
            FontFormat::Ttf | FontFormat::Otf => Container::Sfnt,
            FontFormat::Woff => Container::Woff,
            FontFormat::Woff2 => Container::Woff2,
        }
    }

    /// Format implied by a file name's extension, compared case-insensitively.
    pub fn from_file_name(name: &str) -> Option<FontFormat> {
        Path::new(name)
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| ext.parse().ok())
    }
}
