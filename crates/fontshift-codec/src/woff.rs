//! WOFF 1.0: per-table zlib compression around an SFNT.

use std::collections::HashSet;
use std::io::{Read, Write};

use flate2::Compression;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use tracing::debug;

use crate::error::{CodecError, Result};
use crate::format::WOFF_SIGNATURE;
use crate::io::{Reader, WriteBe};
use crate::sfnt::{Font, checksum, declared_size, head_checksum};
use crate::tag::Tag;

const HEADER_LEN: usize = 44;
const ENTRY_LEN: usize = 20;
const CONTAINER: &str = "woff";

/// Decodes a WOFF 1.0 file into its font.
///
/// Extended metadata and private data are not carried over.
pub fn decode(data: &[u8]) -> Result<Font> {
    let mut header = Reader::new(data, "woff header");
    if header.read_u32()? != WOFF_SIGNATURE {
        return Err(CodecError::UnknownFormat);
    }
    let flavor = header.read_u32()?;
    let length = header.read_u32()? as usize;
    let num_tables = header.read_u16()?;
    let reserved = header.read_u16()?;
    if reserved != 0 {
        return Err(CodecError::malformed(CONTAINER, "reserved header field is not zero"));
    }
    if length != data.len() {
        return Err(CodecError::malformed(
            CONTAINER,
            format!("header length {length} does not match file size {}", data.len()),
        ));
    }
    header.skip(HEADER_LEN - header.pos())?;

    let mut font = Font::new(flavor);
    let mut declared = 0;
    let mut seen = HashSet::with_capacity(num_tables as usize);
    for _ in 0..num_tables {
        let tag = Tag::from_u32(header.read_u32()?);
        let offset = header.read_u32()? as usize;
        let comp_length = header.read_u32()? as usize;
        let orig_length = header.read_u32()? as usize;
        let _orig_checksum = header.read_u32()?;

        if comp_length > orig_length {
            return Err(CodecError::malformed(
                CONTAINER,
                format!("table '{tag}' compressed length exceeds original length"),
            ));
        }
        if !seen.insert(tag) {
            return Err(CodecError::malformed(CONTAINER, format!("duplicate table '{tag}'")));
        }
        declared = declared_size(CONTAINER, [declared, orig_length])?;
        let stored = Reader::at(data, offset, "woff table data")?.read_bytes(comp_length)?;
        let table = if comp_length == orig_length {
            stored.to_vec()
        } else {
            inflate(stored, orig_length, tag)?
        };
        font.push_table(tag, table);
    }
    debug!(num_tables, "decoded woff");
    Ok(font)
}

/// Encodes `font` as WOFF 1.0.
///
/// Each table is zlib-compressed when that makes it smaller and stored as-is
/// otherwise. The WOFF version fields mirror `head.fontRevision`.
pub fn encode(font: &Font) -> Result<Vec<u8>> {
    let tables = font.sorted_tables();
    let (major, minor) = font.font_revision();

    let mut entries = Vec::with_capacity(tables.len() * ENTRY_LEN);
    let mut body = Vec::new();
    let data_start = HEADER_LEN + ENTRY_LEN * tables.len();
    for table in &tables {
        let compressed = deflate(&table.data)?;
        let stored: &[u8] = if compressed.len() < table.data.len() {
            &compressed
        } else {
            &table.data
        };
        let orig_checksum = if table.tag == Tag::HEAD {
            head_checksum(&table.data)
        } else {
            checksum(&table.data)
        };
        entries.put_u32(table.tag.to_u32());
        entries.put_u32((data_start + body.len()) as u32);
        entries.put_u32(stored.len() as u32);
        entries.put_u32(table.data.len() as u32);
        entries.put_u32(orig_checksum);
        body.extend_from_slice(stored);
        body.pad4();
    }

    let total_len = data_start + body.len();
    let mut out = Vec::with_capacity(total_len);
    out.put_u32(WOFF_SIGNATURE);
    out.put_u32(font.sfnt_version());
    out.put_u32(total_len as u32);
    out.put_u16(tables.len() as u16);
    out.put_u16(0);
    out.put_u32(font.sfnt_size() as u32);
    out.put_u16(major);
    out.put_u16(minor);
    // metaOffset, metaLength, metaOrigLength, privOffset, privLength
    for _ in 0..5 {
        out.put_u32(0);
    }
    out.extend_from_slice(&entries);
    out.extend_from_slice(&body);
    debug_assert_eq!(out.len(), total_len);
    debug!(num_tables = tables.len(), size = out.len(), "encoded woff");
    Ok(out)
}

fn deflate(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::with_capacity(data.len()), Compression::best());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

fn inflate(data: &[u8], orig_length: usize, tag: Tag) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    ZlibDecoder::new(data)
        .take(orig_length as u64 + 1)
        .read_to_end(&mut out)?;
    if out.len() != orig_length {
        return Err(CodecError::malformed(
            CONTAINER,
            format!(
                "table '{tag}' inflated to {} bytes, expected {orig_length}",
                out.len()
            ),
        ));
    }
    Ok(out)
}
