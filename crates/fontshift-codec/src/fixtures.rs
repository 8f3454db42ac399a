//! Small hand-built fonts for tests.

use crate::io::WriteBe;
use crate::sfnt::{CFF_VERSION, Font, TRUETYPE_VERSION};
use crate::tag::Tag;
use crate::woff2::glyf::{BBox, Point, SimpleGlyph, build_loca};

pub(crate) const NUM_GLYPHS: u16 = 5;
pub(crate) const X_MINS: [i16; 5] = [100, -200, 0, -190, -2100];
const ADVANCES: [u16; 5] = [700, 900, 500, 900, 3100];

pub(crate) fn head_table(index_to_loc_format: i16) -> Vec<u8> {
    let mut head = Vec::with_capacity(54);
    head.put_u32(0x0001_0000);
    head.put_u32(0x0002_8000); // fontRevision 2.5
    head.put_u32(0); // checkSumAdjustment
    head.put_u32(0x5F0F_3CF5);
    head.put_u16(0x000B);
    head.put_u16(1000);
    head.extend_from_slice(&[0; 16]); // created, modified
    head.put_i16(-2100);
    head.put_i16(-3100);
    head.put_i16(3100);
    head.put_i16(3100);
    head.put_u16(0); // macStyle
    head.put_u16(8);
    head.put_i16(2);
    head.put_i16(index_to_loc_format);
    head.put_i16(0);
    head
}

fn hhea_table(num_h_metrics: u16) -> Vec<u8> {
    let mut hhea = Vec::with_capacity(36);
    hhea.put_u32(0x0001_0000);
    hhea.put_i16(800);
    hhea.put_i16(-200);
    hhea.put_i16(0);
    hhea.put_u16(3100);
    hhea.extend_from_slice(&[0; 6]); // minLsb, minRsb, xMaxExtent
    hhea.put_i16(1);
    hhea.extend_from_slice(&[0; 14]); // run, offset, reserved, metricDataFormat
    hhea.put_u16(num_h_metrics);
    hhea
}

fn maxp_table(version: u32, num_glyphs: u16) -> Vec<u8> {
    let mut maxp = Vec::new();
    maxp.put_u32(version);
    maxp.put_u16(num_glyphs);
    if version == 0x0001_0000 {
        maxp.extend_from_slice(&[0; 26]);
    }
    maxp
}

fn hmtx_table() -> Vec<u8> {
    let mut hmtx = Vec::new();
    for (advance, lsb) in ADVANCES.into_iter().zip(X_MINS) {
        hmtx.put_u16(advance);
        hmtx.put_i16(lsb);
    }
    hmtx
}

fn simple(end_points: Vec<u16>, points: Vec<(i16, i16, bool)>) -> SimpleGlyph {
    let points: Vec<Point> = points
        .into_iter()
        .map(|(x, y, on_curve)| Point { x, y, on_curve })
        .collect();
    SimpleGlyph {
        end_points,
        bbox: BBox::of(&points),
        points,
        instructions: Vec::new(),
        overlap: false,
    }
}

pub(crate) fn square() -> SimpleGlyph {
    simple(
        vec![3],
        vec![(100, 0, true), (100, 700, true), (600, 700, true), (600, 0, true)],
    )
}

/// One contour with an off-curve point, instructions and the overlap flag.
pub(crate) fn triangle() -> SimpleGlyph {
    let mut glyph = simple(
        vec![2],
        vec![(-200, -150, true), (250, 1400, false), (700, -150, true)],
    );
    glyph.instructions = vec![0xb0, 0x01, 0x2c];
    glyph.overlap = true;
    glyph
}

/// Two contours, large deltas, and a stored bbox wider than the outline.
fn wide() -> SimpleGlyph {
    let mut glyph = simple(
        vec![1, 3],
        vec![
            (3000, 3000, true),
            (-2000, 2990, false),
            (1, -3000, true),
            (2999, -2999, true),
        ],
    );
    glyph.bbox = BBox {
        x_min: -2100,
        y_min: -3100,
        x_max: 3100,
        y_max: 3100,
    };
    glyph
}

/// Composite of glyphs 0 and 1 with trailing instructions.
pub(crate) fn composite_glyph() -> Vec<u8> {
    let mut glyph = Vec::new();
    glyph.put_i16(-1);
    glyph.put_i16(-190);
    glyph.put_i16(-170);
    glyph.put_i16(710);
    glyph.put_i16(1406);
    // ARG_1_AND_2_ARE_WORDS | ARGS_ARE_XY_VALUES | MORE_COMPONENTS
    glyph.put_u16(0x0023);
    glyph.put_u16(0);
    glyph.put_i16(10);
    glyph.put_i16(-20);
    // ARGS_ARE_XY_VALUES | WE_HAVE_A_SCALE | WE_HAVE_INSTRUCTIONS
    glyph.put_u16(0x010A);
    glyph.put_u16(1);
    glyph.put_u8(5);
    glyph.put_u8(6);
    glyph.put_u16(0x2000);
    glyph.put_u16(2);
    glyph.extend_from_slice(&[0x01, 0x02]);
    glyph
}

pub(crate) fn glyf_and_loca(index_format: u16) -> (Vec<u8>, Vec<u8>) {
    let mut glyf = Vec::new();
    let mut offsets = vec![0];
    square().write(&mut glyf);
    glyf.pad4();
    offsets.push(glyf.len());
    triangle().write(&mut glyf);
    glyf.pad4();
    offsets.push(glyf.len());
    // glyph 2 is empty
    offsets.push(glyf.len());
    glyf.extend_from_slice(&composite_glyph());
    glyf.pad4();
    offsets.push(glyf.len());
    wide().write(&mut glyf);
    glyf.pad4();
    offsets.push(glyf.len());

    let loca = build_loca(&offsets, index_format).expect("fixture offsets fit");
    (glyf, loca)
}

fn shared_tables(font: &mut Font) {
    font.push_table(Tag(*b"name"), b"\0\0\0\x01\0\x12fixture font name".to_vec());
    font.push_table(Tag(*b"post"), {
        let mut post = Vec::new();
        post.put_u32(0x0003_0000);
        post.extend_from_slice(&[0; 28]);
        post
    });
    font.push_table(Tag(*b"Zzzz"), vec![9; 7]);
}

/// TrueType font with long `loca` offsets and `hmtx` bearings equal to
/// each glyph's `xMin`.
pub(crate) fn truetype_font() -> Font {
    truetype_font_with_loca(1)
}

pub(crate) fn truetype_font_with_loca(index_format: u16) -> Font {
    let (glyf, loca) = glyf_and_loca(index_format);
    let mut font = Font::new(TRUETYPE_VERSION);
    font.push_table(Tag::HEAD, head_table(index_format as i16));
    font.push_table(Tag::HHEA, hhea_table(NUM_GLYPHS));
    font.push_table(Tag::MAXP, maxp_table(0x0001_0000, NUM_GLYPHS));
    font.push_table(Tag::HMTX, hmtx_table());
    font.push_table(Tag::GLYF, glyf);
    font.push_table(Tag::LOCA, loca);
    shared_tables(&mut font);
    font
}

pub(crate) fn cff_font() -> Font {
    let mut font = Font::new(CFF_VERSION);
    font.push_table(Tag::HEAD, head_table(0));
    font.push_table(Tag::HHEA, hhea_table(NUM_GLYPHS));
    font.push_table(Tag::MAXP, maxp_table(0x0000_5000, NUM_GLYPHS));
    font.push_table(Tag::HMTX, hmtx_table());
    font.push_table(Tag(*b"CFF "), (0..=255u8).cycle().take(301).collect());
    shared_tables(&mut font);
    font
}
