//! The SFNT container shared by TrueType and OpenType fonts.
//!
//! [`Font`] is the in-memory form every container decodes to and encodes
//! from: an SFNT version tag plus a list of raw tables.

use tracing::trace;

use crate::error::{CodecError, Result};
use crate::format::Flavor;
use crate::io::{Reader, WriteBe, round4, write_u32_at};
use crate::tag::Tag;

/// `sfntVersion` of TrueType-outline fonts.
pub const TRUETYPE_VERSION: u32 = 0x0001_0000;
/// `sfntVersion` of CFF-outline fonts (`OTTO`).
pub const CFF_VERSION: u32 = u32::from_be_bytes(*b"OTTO");
/// Legacy Apple TrueType `sfntVersion`.
pub const APPLE_TRUE_VERSION: u32 = u32::from_be_bytes(*b"true");
/// Font collection header tag.
pub const COLLECTION_TAG: u32 = u32::from_be_bytes(*b"ttcf");
/// Largest total table size the WOFF and WOFF2 decoders will produce.
pub const MAX_SFNT_SIZE: usize = 128 * 1024 * 1024;

const HEADER_LEN: usize = 12;
const RECORD_LEN: usize = 16;
const CHECKSUM_MAGIC: u32 = 0xB1B0_AFBA;
const HEAD_ADJUSTMENT_OFFSET: usize = 8;

pub(crate) fn is_sfnt_version(version: u32) -> bool {
    matches!(version, TRUETYPE_VERSION | CFF_VERSION | APPLE_TRUE_VERSION)
}

/// Sums table lengths declared in a container header, rejecting totals above
/// [`MAX_SFNT_SIZE`] before anything is decompressed.
pub(crate) fn declared_size(
    container: &'static str,
    lengths: impl IntoIterator<Item = usize>,
) -> Result<usize> {
    lengths
        .into_iter()
        .try_fold(0usize, |total, len| total.checked_add(len))
        .filter(|&total| total <= MAX_SFNT_SIZE)
        .ok_or_else(|| {
            CodecError::malformed(
                container,
                format!("declared table sizes exceed {MAX_SFNT_SIZE} bytes"),
            )
        })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub tag: Tag,
    pub data: Vec<u8>,
}

/// A decoded font: SFNT version plus raw table data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Font {
    sfnt_version: u32,
    tables: Vec<Table>,
}

impl Font {
    pub fn new(sfnt_version: u32) -> Self {
        Self {
            sfnt_version,
            tables: Vec::new(),
        }
    }

    pub fn sfnt_version(&self) -> u32 {
        self.sfnt_version
    }

    pub fn flavor(&self) -> Flavor {
        Flavor::from_sfnt_version(self.sfnt_version)
    }

    /// Adds a table, replacing any existing table with the same tag.
    pub fn push_table(&mut self, tag: Tag, data: Vec<u8>) {
        match self.tables.iter_mut().find(|t| t.tag == tag) {
            Some(existing) => existing.data = data,
            None => self.tables.push(Table { tag, data }),
        }
    }

    pub fn table(&self, tag: Tag) -> Option<&[u8]> {
        self.tables
            .iter()
            .find(|t| t.tag == tag)
            .map(|t| t.data.as_slice())
    }

    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    /// Tables in ascending tag order.
    pub fn sorted_tables(&self) -> Vec<&Table> {
        let mut sorted: Vec<&Table> = self.tables.iter().collect();
        sorted.sort_by_key(|t| t.tag);
        sorted
    }

    /// `head.fontRevision` as (major, minor), or `(1, 0)` without a usable
    /// `head` table.
    pub fn font_revision(&self) -> (u16, u16) {
        self.table(Tag::HEAD)
            .and_then(|head| {
                let mut reader = Reader::at(head, 4, "head.fontRevision").ok()?;
                Some((reader.read_u16().ok()?, reader.read_u16().ok()?))
            })
            .unwrap_or((1, 0))
    }

    /// Size in bytes of [`Font::to_sfnt`]'s output.
    pub fn sfnt_size(&self) -> usize {
        HEADER_LEN
            + RECORD_LEN * self.tables.len()
            + self
                .tables
                .iter()
                .map(|t| round4(t.data.len()))
                .sum::<usize>()
    }

    /// Parses a bare SFNT font.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut reader = Reader::new(data, "sfnt header");
        let sfnt_version = reader.read_u32()?;
        if sfnt_version == COLLECTION_TAG {
            return Err(CodecError::CollectionUnsupported);
        }
        if !is_sfnt_version(sfnt_version) {
            return Err(CodecError::UnknownFormat);
        }
        let num_tables = reader.read_u16()?;
        reader.skip(6)?;

        let mut font = Font::new(sfnt_version);
        let mut records = Reader::new(data, "sfnt table records");
        records.skip(HEADER_LEN)?;
        for _ in 0..num_tables {
            let tag = Tag::from_u32(records.read_u32()?);
            let _checksum = records.read_u32()?;
            let offset = records.read_u32()? as usize;
            let length = records.read_u32()? as usize;
            if font.table(tag).is_some() {
                return Err(CodecError::malformed("sfnt", format!("duplicate table '{tag}'")));
            }
            let table = Reader::at(data, offset, "sfnt table data")?.read_bytes(length)?;
            font.tables.push(Table {
                tag,
                data: table.to_vec(),
            });
        }
        trace!(num_tables, "parsed sfnt table directory");
        Ok(font)
    }

    /// Serializes the font as a bare SFNT.
    ///
    /// Tables are written in tag order, each padded to four bytes, and
    /// `head.checkSumAdjustment` is recomputed over the finished file.
    pub fn to_sfnt(&self) -> Vec<u8> {
        let tables = self.sorted_tables();
        let num_tables = tables.len() as u16;
        let (search_range, entry_selector, range_shift) = search_params(num_tables);

        let mut out = Vec::with_capacity(self.sfnt_size());
        out.put_u32(self.sfnt_version);
        out.put_u16(num_tables);
        out.put_u16(search_range);
        out.put_u16(entry_selector);
        out.put_u16(range_shift);

        let mut offset = HEADER_LEN + RECORD_LEN * tables.len();
        let mut head_offset = None;
        for table in &tables {
            let checksum = if table.tag == Tag::HEAD {
                head_offset = Some(offset);
                head_checksum(&table.data)
            } else {
                checksum(&table.data)
            };
            out.put_u32(table.tag.to_u32());
            out.put_u32(checksum);
            out.put_u32(offset as u32);
            out.put_u32(table.data.len() as u32);
            offset += round4(table.data.len());
        }

        for table in &tables {
            out.extend_from_slice(&table.data);
            out.pad4();
        }

        if let Some(head) = head_offset {
            let head_len = self.table(Tag::HEAD).map_or(0, <[u8]>::len);
            if head_len >= HEAD_ADJUSTMENT_OFFSET + 4 {
                write_u32_at(&mut out, head + HEAD_ADJUSTMENT_OFFSET, 0);
                let adjustment = CHECKSUM_MAGIC.wrapping_sub(checksum(&out));
                write_u32_at(&mut out, head + HEAD_ADJUSTMENT_OFFSET, adjustment);
            }
        }
        out
    }
}

/// OpenType table checksum: the wrapping sum of big-endian `u32` words, the
/// final word zero-padded.
pub fn checksum(data: &[u8]) -> u32 {
    let mut chunks = data.chunks_exact(4);
    let mut sum = chunks
        .by_ref()
        .fold(0u32, |acc, c| acc.wrapping_add(u32::from_be_bytes([c[0], c[1], c[2], c[3]])));
    let rest = chunks.remainder();
    if !rest.is_empty() {
        let mut last = [0u8; 4];
        last[..rest.len()].copy_from_slice(rest);
        sum = sum.wrapping_add(u32::from_be_bytes(last));
    }
    sum
}

/// Checksum of a `head` table with `checkSumAdjustment` treated as zero.
pub(crate) fn head_checksum(head: &[u8]) -> u32 {
    if head.len() < HEAD_ADJUSTMENT_OFFSET + 4 {
        return checksum(head);
    }
    let mut copy = head.to_vec();
    write_u32_at(&mut copy, HEAD_ADJUSTMENT_OFFSET, 0);
    checksum(&copy)
}

fn search_params(num_tables: u16) -> (u16, u16, u16) {
    if num_tables == 0 {
        return (0, 0, 0);
    }
    let entry_selector = 15 - num_tables.leading_zeros() as u16;
    let search_range = (1u16 << entry_selector) * RECORD_LEN as u16;
    let range_shift = num_tables * RECORD_LEN as u16 - search_range;
    (search_range, entry_selector, range_shift)
}
