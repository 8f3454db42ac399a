//! The WOFF2 `glyf`/`loca` transform (transform version 0).
//!
//! The transformed table splits glyph data into seven streams (contour
//! counts, point counts, flags, coordinate triplets, composite records,
//! bounding boxes and instructions) so that Brotli sees runs of similar
//! bytes. `loca` is dropped by the encoder and rebuilt by the decoder.

use tracing::trace;

use super::varint::{read_255_u16, write_255_u16};
use crate::error::{CodecError, Result};
use crate::io::{Reader, WriteBe};

const CONTAINER: &str = "woff2 glyf";
const HEADER_LEN: usize = 36;
const OPTION_OVERLAP_SIMPLE_BITMAP: u16 = 0x0001;

const ON_CURVE: u8 = 0x01;
const X_SHORT: u8 = 0x02;
const Y_SHORT: u8 = 0x04;
const REPEAT: u8 = 0x08;
const X_SAME_OR_POSITIVE: u8 = 0x10;
const Y_SAME_OR_POSITIVE: u8 = 0x20;
const OVERLAP_SIMPLE: u8 = 0x40;

const ARG_1_AND_2_ARE_WORDS: u16 = 0x0001;
const WE_HAVE_A_SCALE: u16 = 0x0008;
const MORE_COMPONENTS: u16 = 0x0020;
const WE_HAVE_AN_X_AND_Y_SCALE: u16 = 0x0040;
const WE_HAVE_A_TWO_BY_TWO: u16 = 0x0080;
const WE_HAVE_INSTRUCTIONS: u16 = 0x0100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Point {
    pub x: i16,
    pub y: i16,
    pub on_curve: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct BBox {
    pub x_min: i16,
    pub y_min: i16,
    pub x_max: i16,
    pub y_max: i16,
}

impl BBox {
    pub(crate) fn of(points: &[Point]) -> Self {
        let Some(first) = points.first() else {
            return BBox::default();
        };
        points.iter().fold(
            BBox {
                x_min: first.x,
                y_min: first.y,
                x_max: first.x,
                y_max: first.y,
            },
            |b, p| BBox {
                x_min: b.x_min.min(p.x),
                y_min: b.y_min.min(p.y),
                x_max: b.x_max.max(p.x),
                y_max: b.y_max.max(p.y),
            },
        )
    }

    fn read(reader: &mut Reader<'_>) -> Result<Self> {
        Ok(BBox {
            x_min: reader.read_i16()?,
            y_min: reader.read_i16()?,
            x_max: reader.read_i16()?,
            y_max: reader.read_i16()?,
        })
    }

    fn write(&self, out: &mut Vec<u8>) {
        out.put_i16(self.x_min);
        out.put_i16(self.y_min);
        out.put_i16(self.x_max);
        out.put_i16(self.y_max);
    }
}

/// A simple (contour-based) TrueType glyph with absolute coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SimpleGlyph {
    pub end_points: Vec<u16>,
    pub points: Vec<Point>,
    pub instructions: Vec<u8>,
    pub overlap: bool,
    pub bbox: BBox,
}

impl SimpleGlyph {
    pub(crate) fn parse(data: &[u8]) -> Result<Self> {
        let mut reader = Reader::new(data, "simple glyph");
        let num_contours = reader.read_i16()?;
        if num_contours <= 0 {
            return Err(CodecError::malformed(CONTAINER, "simple glyph without contours"));
        }
        let bbox = BBox::read(&mut reader)?;

        let mut end_points = Vec::with_capacity(num_contours as usize);
        for _ in 0..num_contours {
            let end = reader.read_u16()?;
            if end_points.last().is_some_and(|&prev| end < prev) {
                return Err(CodecError::malformed(CONTAINER, "contour end points decrease"));
            }
            end_points.push(end);
        }
        let num_points = end_points.last().map_or(0, |&e| e as usize + 1);

        let instruction_len = reader.read_u16()? as usize;
        let instructions = reader.read_bytes(instruction_len)?.to_vec();

        let mut flags = Vec::with_capacity(num_points);
        while flags.len() < num_points {
            let flag = reader.read_u8()?;
            flags.push(flag);
            if flag & REPEAT != 0 {
                let count = reader.read_u8()?;
                flags.extend(std::iter::repeat_n(flag, count as usize));
            }
        }
        if flags.len() != num_points {
            return Err(CodecError::malformed(CONTAINER, "flag repeat runs past the last point"));
        }

        let xs = read_coordinates(&mut reader, &flags, X_SHORT, X_SAME_OR_POSITIVE)?;
        let ys = read_coordinates(&mut reader, &flags, Y_SHORT, Y_SAME_OR_POSITIVE)?;
        let points = flags
            .iter()
            .zip(xs.into_iter().zip(ys))
            .map(|(&flag, (x, y))| Point {
                x,
                y,
                on_curve: flag & ON_CURVE != 0,
            })
            .collect();

        Ok(SimpleGlyph {
            end_points,
            points,
            instructions,
            overlap: flags.first().is_some_and(|f| f & OVERLAP_SIMPLE != 0),
            bbox,
        })
    }

    /// Appends the glyph in `glyf` table form, compressing flag runs.
    pub(crate) fn write(&self, out: &mut Vec<u8>) {
        out.put_i16(self.end_points.len() as i16);
        self.bbox.write(out);
        for &end in &self.end_points {
            out.put_u16(end);
        }
        out.put_u16(self.instructions.len() as u16);
        out.extend_from_slice(&self.instructions);

        let mut flags = Vec::with_capacity(self.points.len());
        let mut xs = Vec::new();
        let mut ys = Vec::new();
        let (mut prev_x, mut prev_y) = (0i16, 0i16);
        for (i, point) in self.points.iter().enumerate() {
            let mut flag = if point.on_curve { ON_CURVE } else { 0 };
            if i == 0 && self.overlap {
                flag |= OVERLAP_SIMPLE;
            }
            let dx = point.x.wrapping_sub(prev_x);
            let dy = point.y.wrapping_sub(prev_y);
            flag |= push_delta(&mut xs, dx, X_SHORT, X_SAME_OR_POSITIVE);
            flag |= push_delta(&mut ys, dy, Y_SHORT, Y_SAME_OR_POSITIVE);
            flags.push(flag);
            (prev_x, prev_y) = (point.x, point.y);
        }

        let mut i = 0;
        while i < flags.len() {
            let flag = flags[i];
            let mut run = 1;
            while i + run < flags.len() && flags[i + run] == flag && run < 256 {
                run += 1;
            }
            if run > 1 {
                out.put_u8(flag | REPEAT);
                out.put_u8((run - 1) as u8);
            } else {
                out.put_u8(flag);
            }
            i += run;
        }
        out.extend_from_slice(&xs);
        out.extend_from_slice(&ys);
    }
}

fn read_coordinates(
    reader: &mut Reader<'_>,
    flags: &[u8],
    short: u8,
    same_or_positive: u8,
) -> Result<Vec<i16>> {
    let mut value = 0i16;
    let mut coords = Vec::with_capacity(flags.len());
    for &flag in flags {
        let delta = if flag & short != 0 {
            let magnitude = i16::from(reader.read_u8()?);
            if flag & same_or_positive != 0 { magnitude } else { -magnitude }
        } else if flag & same_or_positive != 0 {
            0
        } else {
            reader.read_i16()?
        };
        value = value.wrapping_add(delta);
        coords.push(value);
    }
    Ok(coords)
}

fn push_delta(out: &mut Vec<u8>, delta: i16, short: u8, same_or_positive: u8) -> u8 {
    if delta == 0 {
        same_or_positive
    } else if (-255..=255).contains(&delta) {
        out.put_u8(delta.unsigned_abs() as u8);
        if delta > 0 { short | same_or_positive } else { short }
    } else {
        out.put_i16(delta);
        0
    }
}

/// Length of the component records at the start of `data`, and whether the
/// composite carries instructions.
pub(crate) fn composite_extent(data: &[u8]) -> Result<(usize, bool)> {
    let mut reader = Reader::new(data, "composite glyph");
    let mut has_instructions = false;
    loop {
        let flags = reader.read_u16()?;
        let _glyph_index = reader.read_u16()?;
        let args = if flags & ARG_1_AND_2_ARE_WORDS != 0 { 4 } else { 2 };
        let transform = if flags & WE_HAVE_A_SCALE != 0 {
            2
        } else if flags & WE_HAVE_AN_X_AND_Y_SCALE != 0 {
            4
        } else if flags & WE_HAVE_A_TWO_BY_TWO != 0 {
            8
        } else {
            0
        };
        reader.skip(args + transform)?;
        has_instructions |= flags & WE_HAVE_INSTRUCTIONS != 0;
        if flags & MORE_COMPONENTS == 0 {
            return Ok((reader.pos(), has_instructions));
        }
    }
}

/// Decodes one coordinate triplet. `flag` is the raw flag-stream byte; the
/// on-curve bit (0x80) is ignored here.
pub(crate) fn decode_triplet(flag: u8, glyphs: &mut Reader<'_>) -> Result<(i32, i32)> {
    fn with_sign(flag: u8, base: i32) -> i32 {
        if flag & 1 != 0 { base } else { -base }
    }

    let flag = flag & 0x7f;
    let f = i32::from(flag);
    Ok(if flag < 10 {
        let b0 = i32::from(glyphs.read_u8()?);
        (0, with_sign(flag, ((f & 14) << 7) + b0))
    } else if flag < 20 {
        let b0 = i32::from(glyphs.read_u8()?);
        (with_sign(flag, (((f - 10) & 14) << 7) + b0), 0)
    } else if flag < 84 {
        let b0 = f - 20;
        let b1 = i32::from(glyphs.read_u8()?);
        (
            with_sign(flag, 1 + (b0 & 0x30) + (b1 >> 4)),
            with_sign(flag >> 1, 1 + ((b0 & 0x0c) << 2) + (b1 & 0x0f)),
        )
    } else if flag < 120 {
        let b0 = f - 84;
        let b1 = i32::from(glyphs.read_u8()?);
        let b2 = i32::from(glyphs.read_u8()?);
        (
            with_sign(flag, 1 + ((b0 / 12) << 8) + b1),
            with_sign(flag >> 1, 1 + (((b0 % 12) >> 2) << 8) + b2),
        )
    } else if flag < 124 {
        let b1 = i32::from(glyphs.read_u8()?);
        let b2 = i32::from(glyphs.read_u8()?);
        let b3 = i32::from(glyphs.read_u8()?);
        (
            with_sign(flag, (b1 << 4) + (b2 >> 4)),
            with_sign(flag >> 1, ((b2 & 0x0f) << 8) + b3),
        )
    } else {
        let b1 = i32::from(glyphs.read_u8()?);
        let b2 = i32::from(glyphs.read_u8()?);
        let b3 = i32::from(glyphs.read_u8()?);
        let b4 = i32::from(glyphs.read_u8()?);
        (
            with_sign(flag, (b1 << 8) + b2),
            with_sign(flag >> 1, (b3 << 8) + b4),
        )
    })
}

/// Encodes one point delta as a flag byte plus one to four glyph-stream
/// bytes. Both deltas must lie within `-65535..=65535`.
pub(crate) fn encode_triplet(flags: &mut Vec<u8>, glyphs: &mut Vec<u8>, on_curve: bool, dx: i32, dy: i32) {
    let abs_x = dx.unsigned_abs();
    let abs_y = dy.unsigned_abs();
    let on_curve_bit: u32 = if on_curve { 0 } else { 128 };
    let x_sign: u32 = if dx < 0 { 0 } else { 1 };
    let y_sign: u32 = if dy < 0 { 0 } else { 1 };
    let xy_sign = x_sign + 2 * y_sign;

    let flag = if dx == 0 && abs_y < 1280 {
        glyphs.put_u8((abs_y & 0xff) as u8);
        on_curve_bit + ((abs_y & 0xf00) >> 7) + y_sign
    } else if dy == 0 && abs_x < 1280 {
        glyphs.put_u8((abs_x & 0xff) as u8);
        on_curve_bit + 10 + ((abs_x & 0xf00) >> 7) + x_sign
    } else if abs_x < 65 && abs_y < 65 {
        glyphs.put_u8(((((abs_x - 1) & 0x0f) << 4) | ((abs_y - 1) & 0x0f)) as u8);
        on_curve_bit + 20 + ((abs_x - 1) & 0x30) + (((abs_y - 1) & 0x30) >> 2) + xy_sign
    } else if abs_x < 769 && abs_y < 769 {
        glyphs.put_u8(((abs_x - 1) & 0xff) as u8);
        glyphs.put_u8(((abs_y - 1) & 0xff) as u8);
        on_curve_bit + 84 + 12 * (((abs_x - 1) & 0x300) >> 8) + (((abs_y - 1) & 0x300) >> 6) + xy_sign
    } else if abs_x < 4096 && abs_y < 4096 {
        glyphs.put_u8((abs_x >> 4) as u8);
        glyphs.put_u8((((abs_x & 0x0f) << 4) | (abs_y >> 8)) as u8);
        glyphs.put_u8((abs_y & 0xff) as u8);
        on_curve_bit + 120 + xy_sign
    } else {
        glyphs.put_u16(abs_x as u16);
        glyphs.put_u16(abs_y as u16);
        on_curve_bit + 124 + xy_sign
    };
    flags.put_u8(flag as u8);
}

/// Glyph offsets from a `loca` table.
pub(crate) fn loca_offsets(loca: &[u8], num_glyphs: u16, index_format: u16, glyf_len: usize) -> Result<Vec<usize>> {
    let count = num_glyphs as usize + 1;
    let mut reader = Reader::new(loca, "loca");
    let mut offsets = Vec::with_capacity(count);
    for _ in 0..count {
        let offset = match index_format {
            0 => reader.read_u16()? as usize * 2,
            1 => reader.read_u32()? as usize,
            other => {
                return Err(CodecError::malformed(
                    CONTAINER,
                    format!("unknown indexToLocFormat {other}"),
                ));
            }
        };
        if offsets.last().is_some_and(|&prev| offset < prev) || offset > glyf_len {
            return Err(CodecError::malformed(CONTAINER, "loca offsets out of order or bounds"));
        }
        offsets.push(offset);
    }
    Ok(offsets)
}

pub(crate) fn build_loca(offsets: &[usize], index_format: u16) -> Result<Vec<u8>> {
    let mut loca = Vec::with_capacity(offsets.len() * 4);
    for &offset in offsets {
        if index_format == 0 {
            if offset > 0x1_FFFE || offset % 2 != 0 {
                return Err(CodecError::malformed(
                    CONTAINER,
                    "glyph data does not fit the short loca format",
                ));
            }
            loca.put_u16((offset / 2) as u16);
        } else {
            loca.put_u32(offset as u32);
        }
    }
    Ok(loca)
}

/// Output of [`transform`]: the transformed table plus each glyph's `xMin`,
/// which the `hmtx` transform needs.
#[derive(Debug)]
pub(crate) struct Transformed {
    pub data: Vec<u8>,
    pub x_mins: Vec<i16>,
}

fn bitmap_set(bitmap: &mut [u8], index: usize) {
    bitmap[index >> 3] |= 0x80 >> (index & 7);
}

fn bitmap_get(bitmap: &[u8], index: usize) -> bool {
    bitmap.get(index >> 3).is_some_and(|b| b & (0x80 >> (index & 7)) != 0)
}

fn bbox_bitmap_len(num_glyphs: u16) -> usize {
    4 * ((num_glyphs as usize + 31) / 32)
}

/// Builds the transformed `glyf` table from `glyf` and `loca`.
pub(crate) fn transform(glyf: &[u8], loca: &[u8], num_glyphs: u16, index_format: u16) -> Result<Transformed> {
    let offsets = loca_offsets(loca, num_glyphs, index_format, glyf.len())?;
    let count = num_glyphs as usize;

    let mut n_contour = Vec::with_capacity(count * 2);
    let mut n_points = Vec::new();
    let mut flag_stream = Vec::new();
    let mut glyph_stream = Vec::new();
    let mut composite_stream = Vec::new();
    let mut bbox_bitmap = vec![0u8; bbox_bitmap_len(num_glyphs)];
    let mut bbox_stream = Vec::new();
    let mut instruction_stream = Vec::new();
    let mut overlap_bitmap = vec![0u8; count.div_ceil(8)];
    let mut has_overlap = false;
    let mut x_mins = Vec::with_capacity(count);

    for (index, window) in offsets.windows(2).enumerate() {
        let glyph = &glyf[window[0]..window[1]];
        let num_contours = if glyph.len() >= 2 {
            i16::from_be_bytes([glyph[0], glyph[1]])
        } else {
            0
        };

        if num_contours == 0 {
            n_contour.put_i16(0);
            x_mins.push(0);
        } else if num_contours > 0 {
            let simple = SimpleGlyph::parse(glyph)?;
            n_contour.put_i16(num_contours);
            let mut previous_end: i32 = -1;
            for &end in &simple.end_points {
                write_255_u16(&mut n_points, (i32::from(end) - previous_end) as u16);
                previous_end = i32::from(end);
            }
            let (mut x, mut y) = (0i32, 0i32);
            for point in &simple.points {
                let (px, py) = (i32::from(point.x), i32::from(point.y));
                encode_triplet(&mut flag_stream, &mut glyph_stream, point.on_curve, px - x, py - y);
                (x, y) = (px, py);
            }
            write_255_u16(&mut glyph_stream, simple.instructions.len() as u16);
            instruction_stream.extend_from_slice(&simple.instructions);

            if BBox::of(&simple.points) != simple.bbox {
                bitmap_set(&mut bbox_bitmap, index);
                simple.bbox.write(&mut bbox_stream);
            }
            if simple.overlap {
                bitmap_set(&mut overlap_bitmap, index);
                has_overlap = true;
            }
            x_mins.push(simple.bbox.x_min);
        } else {
            let mut reader = Reader::new(glyph, "composite glyph");
            reader.skip(2)?;
            let bbox = BBox::read(&mut reader)?;
            let components = &glyph[reader.pos()..];
            let (len, has_instructions) = composite_extent(components)?;
            n_contour.put_i16(-1);
            bitmap_set(&mut bbox_bitmap, index);
            bbox.write(&mut bbox_stream);
            composite_stream.extend_from_slice(&components[..len]);
            if has_instructions {
                let mut tail = Reader::new(&components[len..], "composite instructions");
                let instruction_len = tail.read_u16()?;
                write_255_u16(&mut glyph_stream, instruction_len);
                instruction_stream.extend_from_slice(tail.read_bytes(instruction_len as usize)?);
            }
            x_mins.push(bbox.x_min);
        }
    }

    let mut out = Vec::new();
    out.put_u16(0);
    out.put_u16(if has_overlap { OPTION_OVERLAP_SIMPLE_BITMAP } else { 0 });
    out.put_u16(num_glyphs);
    out.put_u16(index_format);
    out.put_u32(n_contour.len() as u32);
    out.put_u32(n_points.len() as u32);
    out.put_u32(flag_stream.len() as u32);
    out.put_u32(glyph_stream.len() as u32);
    out.put_u32(composite_stream.len() as u32);
    out.put_u32((bbox_bitmap.len() + bbox_stream.len()) as u32);
    out.put_u32(instruction_stream.len() as u32);
    out.extend_from_slice(&n_contour);
    out.extend_from_slice(&n_points);
    out.extend_from_slice(&flag_stream);
    out.extend_from_slice(&glyph_stream);
    out.extend_from_slice(&composite_stream);
    out.extend_from_slice(&bbox_bitmap);
    out.extend_from_slice(&bbox_stream);
    out.extend_from_slice(&instruction_stream);
    if has_overlap {
        out.extend_from_slice(&overlap_bitmap);
    }
    trace!(num_glyphs, size = out.len(), original = glyf.len(), "transformed glyf");
    Ok(Transformed { data: out, x_mins })
}

/// Output of [`reconstruct`].
#[derive(Debug)]
pub(crate) struct Reconstructed {
    pub glyf: Vec<u8>,
    pub loca: Vec<u8>,
    pub x_mins: Vec<i16>,
}

/// Rebuilds `glyf` and `loca` from a transformed `glyf` table.
pub(crate) fn reconstruct(data: &[u8]) -> Result<Reconstructed> {
    let mut header = Reader::new(data, "transformed glyf header");
    let _reserved = header.read_u16()?;
    let option_flags = header.read_u16()?;
    let num_glyphs = header.read_u16()?;
    let index_format = header.read_u16()?;
    let mut sizes = [0usize; 7];
    for size in &mut sizes {
        *size = header.read_u32()? as usize;
    }

    let mut streams = Reader::at(data, HEADER_LEN, "transformed glyf streams")?;
    let mut n_contour = Reader::new(streams.read_bytes(sizes[0])?, "nContour stream");
    let mut n_points = Reader::new(streams.read_bytes(sizes[1])?, "nPoints stream");
    let mut flag_stream = Reader::new(streams.read_bytes(sizes[2])?, "flag stream");
    let mut glyph_stream = Reader::new(streams.read_bytes(sizes[3])?, "glyph stream");
    let composite_stream = streams.read_bytes(sizes[4])?;
    let mut composite_pos = 0;
    let bbox_block = streams.read_bytes(sizes[5])?;
    let mut instruction_stream = Reader::new(streams.read_bytes(sizes[6])?, "instruction stream");
    let overlap_bitmap = if option_flags & OPTION_OVERLAP_SIMPLE_BITMAP != 0 {
        streams.read_bytes((num_glyphs as usize).div_ceil(8))?
    } else {
        &[]
    };

    let bitmap_len = bbox_bitmap_len(num_glyphs);
    if bbox_block.len() < bitmap_len {
        return Err(CodecError::Truncated { what: "bbox bitmap" });
    }
    let (bbox_bitmap, bbox_data) = bbox_block.split_at(bitmap_len);
    let mut bbox_stream = Reader::new(bbox_data, "bbox stream");

    let count = num_glyphs as usize;
    let mut glyf = Vec::new();
    let mut offsets = Vec::with_capacity(count + 1);
    let mut x_mins = Vec::with_capacity(count);

    for index in 0..count {
        offsets.push(glyf.len());
        let num_contours = n_contour.read_i16()?;
        let has_bbox = bitmap_get(bbox_bitmap, index);

        if num_contours == 0 {
            if has_bbox {
                return Err(CodecError::malformed(CONTAINER, "empty glyph with explicit bbox"));
            }
            x_mins.push(0);
            continue;
        }

        if num_contours < 0 {
            if !has_bbox {
                return Err(CodecError::malformed(CONTAINER, "composite glyph without bbox"));
            }
            let bbox = BBox::read(&mut bbox_stream)?;
            let rest = &composite_stream[composite_pos..];
            let (len, has_instructions) = composite_extent(rest)?;
            let components = &rest[..len];
            composite_pos += len;

            glyf.put_i16(-1);
            bbox.write(&mut glyf);
            glyf.extend_from_slice(components);
            if has_instructions {
                let instruction_len = read_255_u16(&mut glyph_stream)?;
                glyf.put_u16(instruction_len);
                glyf.extend_from_slice(instruction_stream.read_bytes(instruction_len as usize)?);
            }
            x_mins.push(bbox.x_min);
        } else {
            let mut end_points = Vec::with_capacity(num_contours as usize);
            let mut total: u32 = 0;
            for _ in 0..num_contours {
                total += u32::from(read_255_u16(&mut n_points)?);
                if total == 0 || total > u32::from(u16::MAX) + 1 {
                    return Err(CodecError::malformed(CONTAINER, "invalid contour point count"));
                }
                end_points.push((total - 1) as u16);
            }

            let mut points = Vec::with_capacity(total as usize);
            let (mut x, mut y) = (0i32, 0i32);
            for _ in 0..total {
                let flag = flag_stream.read_u8()?;
                let (dx, dy) = decode_triplet(flag, &mut glyph_stream)?;
                x += dx;
                y += dy;
                points.push(Point {
                    x: i16::try_from(x)
                        .map_err(|_| CodecError::malformed(CONTAINER, "x coordinate out of range"))?,
                    y: i16::try_from(y)
                        .map_err(|_| CodecError::malformed(CONTAINER, "y coordinate out of range"))?,
                    on_curve: flag & 0x80 == 0,
                });
            }

            let instruction_len = read_255_u16(&mut glyph_stream)?;
            let instructions = instruction_stream.read_bytes(instruction_len as usize)?.to_vec();
            let bbox = if has_bbox {
                BBox::read(&mut bbox_stream)?
            } else {
                BBox::of(&points)
            };
            let glyph = SimpleGlyph {
                end_points,
                points,
                instructions,
                overlap: bitmap_get(overlap_bitmap, index),
                bbox,
            };
            glyph.write(&mut glyf);
            x_mins.push(bbox.x_min);
        }
        glyf.pad4();
    }
    offsets.push(glyf.len());

    let loca = build_loca(&offsets, index_format)?;
    trace!(num_glyphs, size = glyf.len(), "reconstructed glyf");
    Ok(Reconstructed { glyf, loca, x_mins })
}

/// `xMin` of every glyph in an untransformed `glyf` table; zero for empty
/// glyphs.
pub(crate) fn x_mins(glyf: &[u8], loca: &[u8], num_glyphs: u16, index_format: u16) -> Result<Vec<i16>> {
    let offsets = loca_offsets(loca, num_glyphs, index_format, glyf.len())?;
    offsets
        .windows(2)
        .map(|w| {
            if w[1] - w[0] < 10 {
                Ok(0)
            } else {
                Reader::at(&glyf[w[0]..w[1]], 2, "glyph header")?.read_i16()
            }
        })
        .collect()
}
