//! WOFF 2.0: a single Brotli stream over the font's tables, with the `glyf`,
//! `loca` and `hmtx` tables optionally transformed first.

pub(crate) mod glyf;
mod hmtx;
mod varint;

use std::collections::HashSet;
use std::io::Read;

use tracing::{debug, warn};

use crate::error::{CodecError, Result};
use crate::format::{Flavor, WOFF2_SIGNATURE};
use crate::io::{Reader, WriteBe, read_u16_at, round4};
use crate::sfnt::{COLLECTION_TAG, Font, Table, declared_size};
use crate::tag::Tag;
use varint::{read_base128, write_base128};

const HEADER_LEN: usize = 48;
const CONTAINER: &str = "woff2";
const EXPLICIT_TAG: u8 = 0x3f;

const BROTLI_QUALITY: i32 = 11;
const BROTLI_WINDOW: i32 = 22;

const HHEA_NUM_H_METRICS_OFFSET: usize = 34;
const MAXP_NUM_GLYPHS_OFFSET: usize = 4;
const HEAD_FLAGS_OFFSET: usize = 16;
const HEAD_INDEX_TO_LOC_FORMAT_OFFSET: usize = 50;
/// `head.flags` bit 11: font data went through a lossless transform.
const HEAD_FLAG_TRANSFORMED: u16 = 1 << 11;

/// Tags encodable in the low six bits of a directory entry's flags byte.
const KNOWN_TAGS: [&[u8; 4]; 63] = [
    b"cmap", b"head", b"hhea", b"hmtx", b"maxp", b"name", b"OS/2", b"post",
    b"cvt ", b"fpgm", b"glyf", b"loca", b"prep", b"CFF ", b"VORG", b"EBDT",
    b"EBLC", b"gasp", b"hdmx", b"kern", b"LTSH", b"PCLT", b"VDMX", b"vhea",
    b"vmtx", b"BASE", b"GDEF", b"GPOS", b"GSUB", b"EBSC", b"JSTF", b"MATH",
    b"CBDT", b"CBLC", b"COLR", b"CPAL", b"SVG ", b"sbix", b"acnt", b"avar",
    b"bdat", b"bloc", b"bsln", b"cvar", b"fdsc", b"feat", b"fmtx", b"fvar",
    b"gvar", b"hsty", b"just", b"lcar", b"mort", b"morx", b"opbd", b"prop",
    b"trak", b"Zapf", b"Silf", b"Glat", b"Gloc", b"Feat", b"Sill",
];

fn known_tag_index(tag: Tag) -> Option<u8> {
    KNOWN_TAGS
        .iter()
        .position(|known| **known == tag.0)
        .map(|i| i as u8)
}

/// `glyf`/`loca` use 0 for "transformed" and 3 for "stored as-is"; every
/// other table uses 0 for "stored as-is".
fn is_null_transform(tag: Tag, version: u8) -> bool {
    if tag == Tag::GLYF || tag == Tag::LOCA {
        version == 3
    } else {
        version == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    tag: Tag,
    version: u8,
    orig_length: u32,
    transform_length: Option<u32>,
}

impl Entry {
    fn stored_length(&self) -> usize {
        self.transform_length.unwrap_or(self.orig_length) as usize
    }

    fn read(reader: &mut Reader<'_>) -> Result<Self> {
        let flags = reader.read_u8()?;
        let tag = match flags & EXPLICIT_TAG {
            EXPLICIT_TAG => Tag::from_u32(reader.read_u32()?),
            index => Tag(*KNOWN_TAGS[index as usize]),
        };
        let version = flags >> 6;
        let orig_length = read_base128(reader)?;
        let transform_length = if is_null_transform(tag, version) {
            None
        } else {
            Some(read_base128(reader)?)
        };
        Ok(Entry {
            tag,
            version,
            orig_length,
            transform_length,
        })
    }

    fn write(&self, out: &mut Vec<u8>) {
        let version_bits = self.version << 6;
        match known_tag_index(self.tag) {
            Some(index) => out.put_u8(version_bits | index),
            None => {
                out.put_u8(version_bits | EXPLICIT_TAG);
                out.put_u32(self.tag.to_u32());
            }
        }
        write_base128(out, self.orig_length);
        if let Some(length) = self.transform_length {
            write_base128(out, length);
        }
    }
}

/// Decodes a WOFF 2.0 file into its font, undoing any table transforms.
///
/// Collections, extended metadata and private data are not supported; the
/// latter two are ignored.
pub fn decode(data: &[u8]) -> Result<Font> {
    let mut header = Reader::new(data, "woff2 header");
    if header.read_u32()? != WOFF2_SIGNATURE {
        return Err(CodecError::UnknownFormat);
    }
    let flavor = header.read_u32()?;
    if flavor == COLLECTION_TAG {
        return Err(CodecError::CollectionUnsupported);
    }
    let length = header.read_u32()? as usize;
    let num_tables = header.read_u16()?;
    let reserved = header.read_u16()?;
    let _total_sfnt_size = header.read_u32()?;
    let total_compressed_size = header.read_u32()? as usize;
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

    let mut entries = Vec::with_capacity(num_tables as usize);
    let mut seen = HashSet::with_capacity(num_tables as usize);
    for _ in 0..num_tables {
        let entry = Entry::read(&mut header)?;
        if !seen.insert(entry.tag) {
            return Err(CodecError::malformed(CONTAINER, format!("duplicate table '{}'", entry.tag)));
        }
        entries.push(entry);
    }

    let compressed = header.read_bytes(total_compressed_size)?;
    let expected = declared_size(CONTAINER, entries.iter().map(Entry::stored_length))?;
    let stream = decompress(compressed, expected)?;

    let mut tables = Reader::new(&stream, "woff2 table stream");
    let mut raw = Vec::with_capacity(entries.len());
    for entry in &entries {
        raw.push((entry, tables.read_bytes(entry.stored_length())?));
    }

    let mut font = Font::new(flavor);
    let mut glyf_x_mins = None;
    for &(entry, bytes) in &raw {
        if is_null_transform(entry.tag, entry.version) {
            font.push_table(entry.tag, bytes.to_vec());
            continue;
        }
        match (entry.tag, entry.version) {
            (Tag::GLYF, 0) => {
                let loca_transformed = entries
                    .iter()
                    .any(|e| e.tag == Tag::LOCA && e.version == 0);
                if !loca_transformed {
                    return Err(CodecError::malformed(CONTAINER, "transformed glyf without transformed loca"));
                }
                let rebuilt = glyf::reconstruct(bytes)?;
                font.push_table(Tag::GLYF, rebuilt.glyf);
                font.push_table(Tag::LOCA, rebuilt.loca);
                glyf_x_mins = Some(rebuilt.x_mins);
            }
            (Tag::LOCA, 0) => {
                if entry.transform_length != Some(0) {
                    return Err(CodecError::malformed(CONTAINER, "transformed loca carries data"));
                }
                if !entries.iter().any(|e| e.tag == Tag::GLYF && e.version == 0) {
                    return Err(CodecError::malformed(CONTAINER, "transformed loca without transformed glyf"));
                }
            }
            (Tag::HMTX, 1) => {}
            (tag, version) => return Err(CodecError::UnsupportedTransform { tag, version }),
        }
    }

    // hmtx depends on glyf, which may come later in the directory.
    if let Some(&(entry, bytes)) = raw.iter().find(|(e, _)| e.tag == Tag::HMTX && e.version == 1) {
        let num_glyphs = read_u16_at(table(&font, Tag::MAXP)?, MAXP_NUM_GLYPHS_OFFSET, "maxp")?;
        let num_h_metrics = read_u16_at(table(&font, Tag::HHEA)?, HHEA_NUM_H_METRICS_OFFSET, "hhea")?;
        let x_mins = match glyf_x_mins {
            Some(x_mins) => x_mins,
            None => {
                let index_format =
                    read_u16_at(table(&font, Tag::HEAD)?, HEAD_INDEX_TO_LOC_FORMAT_OFFSET, "head")?;
                glyf::x_mins(
                    table(&font, Tag::GLYF)?,
                    table(&font, Tag::LOCA)?,
                    num_glyphs,
                    index_format,
                )?
            }
        };
        let hmtx = hmtx::reconstruct(bytes, num_h_metrics, num_glyphs, &x_mins)?;
        if hmtx.len() != entry.orig_length as usize {
            return Err(CodecError::malformed(CONTAINER, "reconstructed hmtx length mismatch"));
        }
        font.push_table(Tag::HMTX, hmtx);
    }

    debug!(num_tables, "decoded woff2");
    Ok(font)
}

fn table(font: &Font, tag: Tag) -> Result<&[u8]> {
    font.table(tag)
        .ok_or_else(|| CodecError::malformed(CONTAINER, format!("missing required table '{tag}'")))
}

fn decompress(data: &[u8], expected: usize) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    brotli::Decompressor::new(data, 4096)
        .take(expected as u64 + 1)
        .read_to_end(&mut out)?;
    if out.len() != expected {
        return Err(CodecError::malformed(
            CONTAINER,
            format!("table stream decompressed to {} bytes, expected {expected}", out.len()),
        ));
    }
    Ok(out)
}

fn compress(data: &[u8]) -> Result<Vec<u8>> {
    let params = brotli::enc::BrotliEncoderParams {
        quality: BROTLI_QUALITY,
        lgwin: BROTLI_WINDOW,
        size_hint: data.len(),
        ..Default::default()
    };
    let mut out = Vec::new();
    brotli::BrotliCompress(&mut &data[..], &mut out, &params)?;
    Ok(out)
}

/// Transformed forms of `glyf`, `loca` and `hmtx`, when they apply.
struct Transforms {
    glyf: Vec<u8>,
    hmtx: Option<Vec<u8>>,
}

fn transform_tables(font: &Font) -> Result<Transforms> {
    let glyf_table = table(font, Tag::GLYF)?;
    let loca = table(font, Tag::LOCA)?;
    let head = table(font, Tag::HEAD)?;
    let maxp = table(font, Tag::MAXP)?;
    let num_glyphs = read_u16_at(maxp, MAXP_NUM_GLYPHS_OFFSET, "maxp")?;
    let index_format = read_u16_at(head, HEAD_INDEX_TO_LOC_FORMAT_OFFSET, "head")?;

    let transformed = glyf::transform(glyf_table, loca, num_glyphs, index_format)?;
    // The decoder rebuilds loca in canonical form; only transform when that
    // reproduces the original tables.
    let rebuilt = glyf::reconstruct(&transformed.data)?;
    if rebuilt.glyf != glyf_table || rebuilt.loca != loca {
        return Err(CodecError::malformed(CONTAINER, "glyf table is not in canonical form"));
    }

    let hmtx = match (font.table(Tag::HMTX), font.table(Tag::HHEA)) {
        (Some(hmtx), Some(hhea)) => {
            let num_h_metrics = read_u16_at(hhea, HHEA_NUM_H_METRICS_OFFSET, "hhea")?;
            hmtx::transform(hmtx, num_h_metrics, num_glyphs, &transformed.x_mins)?
        }
        _ => None,
    };
    Ok(Transforms {
        glyf: transformed.data,
        hmtx,
    })
}

/// Directory order with `loca` moved directly after `glyf`.
fn directory_order(font: &Font) -> Vec<&Table> {
    let mut tables = font.sorted_tables();
    let Some(loca) = tables.iter().position(|t| t.tag == Tag::LOCA) else {
        return tables;
    };
    let loca = tables.remove(loca);
    match tables.iter().position(|t| t.tag == Tag::GLYF) {
        Some(glyf) => tables.insert(glyf + 1, loca),
        None => tables.push(loca),
    }
    tables
}

/// Encodes `font` as WOFF 2.0.
///
/// TrueType fonts get the `glyf`/`loca` transform, and the `hmtx` transform
/// when it saves space. Fonts whose glyph data cannot be transformed
/// losslessly are stored with null transforms instead.
pub fn encode(font: &Font) -> Result<Vec<u8>> {
    let transforms = if font.flavor() == Flavor::TrueType
        && font.table(Tag::GLYF).is_some()
        && font.table(Tag::LOCA).is_some()
    {
        match transform_tables(font) {
            Ok(transforms) => Some(transforms),
            Err(err) => {
                warn!(error = %err, "storing glyf untransformed");
                None
            }
        }
    } else {
        None
    };

    let mut entries = Vec::new();
    let mut stream = Vec::new();
    for table in directory_order(font) {
        let orig_length = table.data.len() as u32;
        let (version, data): (u8, std::borrow::Cow<'_, [u8]>) = match (table.tag, &transforms) {
            (Tag::GLYF, Some(t)) => (0, t.glyf.as_slice().into()),
            (Tag::LOCA, Some(_)) => (0, (&[][..]).into()),
            (Tag::GLYF | Tag::LOCA, None) => (3, table.data.as_slice().into()),
            (Tag::HMTX, Some(Transforms { hmtx: Some(hmtx), .. })) => (1, hmtx.as_slice().into()),
            (Tag::HEAD, Some(_)) => (0, mark_transformed(&table.data).into()),
            _ => (0, table.data.as_slice().into()),
        };
        let transform_length =
            (!is_null_transform(table.tag, version)).then_some(data.len() as u32);
        entries.push(Entry {
            tag: table.tag,
            version,
            orig_length,
            transform_length,
        });
        stream.extend_from_slice(&data);
    }

    let compressed = compress(&stream)?;
    let out = assemble(font, &entries, &compressed);
    debug!(
        num_tables = entries.len(),
        transformed = transforms.is_some(),
        size = out.len(),
        "encoded woff2"
    );
    Ok(out)
}

fn mark_transformed(head: &[u8]) -> Vec<u8> {
    let mut head = head.to_vec();
    if let Some(flags) = head.get_mut(HEAD_FLAGS_OFFSET..HEAD_FLAGS_OFFSET + 2) {
        let value = u16::from_be_bytes([flags[0], flags[1]]) | HEAD_FLAG_TRANSFORMED;
        flags.copy_from_slice(&value.to_be_bytes());
    }
    head
}

fn assemble(font: &Font, entries: &[Entry], compressed: &[u8]) -> Vec<u8> {
    let mut directory = Vec::new();
    for entry in entries {
        entry.write(&mut directory);
    }
    let total_len = round4(HEADER_LEN + directory.len() + compressed.len());
    let (major, minor) = font.font_revision();

    let mut out = Vec::with_capacity(total_len);
    out.put_u32(WOFF2_SIGNATURE);
    out.put_u32(font.sfnt_version());
    out.put_u32(total_len as u32);
    out.put_u16(entries.len() as u16);
    out.put_u16(0);
    out.put_u32(font.sfnt_size() as u32);
    out.put_u32(compressed.len() as u32);
    out.put_u16(major);
    out.put_u16(minor);
    // metaOffset, metaLength, metaOrigLength, privOffset, privLength
    for _ in 0..5 {
        out.put_u32(0);
    }
    out.extend_from_slice(&directory);
    out.extend_from_slice(compressed);
    out.pad4();
    out
}
