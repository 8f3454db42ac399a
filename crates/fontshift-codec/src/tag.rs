use std::fmt;

/// A four-byte OpenType table tag.
///
/// Ordering is bytewise, which matches the ascending order required for
/// SFNT table records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tag(pub [u8; 4]);

impl Tag {
    pub const HEAD: Tag = Tag(*b"head");
    pub const HHEA: Tag = Tag(*b"hhea");
    pub const HMTX: Tag = Tag(*b"hmtx");
    pub const MAXP: Tag = Tag(*b"maxp");
    pub const GLYF: Tag = Tag(*b"glyf");
    pub const LOCA: Tag = Tag(*b"loca");

    pub const fn from_u32(value: u32) -> Self {
        Tag(value.to_be_bytes())
    }

    pub const fn to_u32(self) -> u32 {
        u32::from_be_bytes(self.0)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in &self.0 {
            let c = if b.is_ascii_graphic() || b == b' ' { b as char } else { '?' };
            write!(f, "{c}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_follows_bytes() {
        let mut tags = vec![Tag::LOCA, Tag(*b"OS/2"), Tag::GLYF, Tag::HEAD];
        tags.sort();
        assert_eq!(tags, vec![Tag(*b"OS/2"), Tag::GLYF, Tag::HEAD, Tag::LOCA]);
    }

    #[test]
    fn display_replaces_binary_bytes() {
        assert_eq!(Tag(*b"cvt ").to_string(), "cvt ");
        assert_eq!(Tag([0, b'a', b'b', 0xff]).to_string(), "?ab?");
    }
}
