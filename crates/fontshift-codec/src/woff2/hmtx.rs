//! The WOFF2 `hmtx` transform (transform version 1).
//!
//! Left side bearings that equal the glyph's `xMin` are dropped and rebuilt
//! from `glyf` on decode.

use crate::error::{CodecError, Result};
use crate::io::{Reader, WriteBe};

const CONTAINER: &str = "woff2 hmtx";
const PROPORTIONAL_LSBS_OMITTED: u8 = 0x01;
const MONOSPACED_LSBS_OMITTED: u8 = 0x02;

struct Metrics {
    advances: Vec<u16>,
    lsbs: Vec<i16>,
    monospaced_lsbs: Vec<i16>,
}

fn parse(hmtx: &[u8], num_h_metrics: u16, num_glyphs: u16) -> Result<Metrics> {
    if num_h_metrics == 0 || num_h_metrics > num_glyphs {
        return Err(CodecError::malformed(
            CONTAINER,
            format!("numberOfHMetrics {num_h_metrics} does not fit {num_glyphs} glyphs"),
        ));
    }
    let mut reader = Reader::new(hmtx, "hmtx");
    let mut advances = Vec::with_capacity(num_h_metrics as usize);
    let mut lsbs = Vec::with_capacity(num_h_metrics as usize);
    for _ in 0..num_h_metrics {
        advances.push(reader.read_u16()?);
        lsbs.push(reader.read_i16()?);
    }
    let monospaced_lsbs = (num_h_metrics..num_glyphs)
        .map(|_| reader.read_i16())
        .collect::<Result<_>>()?;
    Ok(Metrics {
        advances,
        lsbs,
        monospaced_lsbs,
    })
}

/// Returns the transformed table, or `None` when no bearing can be dropped.
pub(crate) fn transform(
    hmtx: &[u8],
    num_h_metrics: u16,
    num_glyphs: u16,
    x_mins: &[i16],
) -> Result<Option<Vec<u8>>> {
    let metrics = parse(hmtx, num_h_metrics, num_glyphs)?;
    let expected = 4 * num_h_metrics as usize + 2 * (num_glyphs - num_h_metrics) as usize;
    if hmtx.len() != expected || x_mins.len() != num_glyphs as usize {
        return Ok(None);
    }

    let (proportional_x_mins, monospaced_x_mins) = x_mins.split_at(num_h_metrics as usize);
    let mut flags = 0;
    if metrics.lsbs == proportional_x_mins {
        flags |= PROPORTIONAL_LSBS_OMITTED;
    }
    if metrics.monospaced_lsbs == monospaced_x_mins {
        flags |= MONOSPACED_LSBS_OMITTED;
    }

    let mut out = Vec::with_capacity(hmtx.len());
    out.put_u8(flags);
    for &advance in &metrics.advances {
        out.put_u16(advance);
    }
    if flags & PROPORTIONAL_LSBS_OMITTED == 0 {
        for &lsb in &metrics.lsbs {
            out.put_i16(lsb);
        }
    }
    if flags & MONOSPACED_LSBS_OMITTED == 0 {
        for &lsb in &metrics.monospaced_lsbs {
            out.put_i16(lsb);
        }
    }
    Ok((out.len() < hmtx.len()).then_some(out))
}

/// Rebuilds `hmtx` from its transformed form and the glyphs' `xMin` values.
pub(crate) fn reconstruct(data: &[u8], num_h_metrics: u16, num_glyphs: u16, x_mins: &[i16]) -> Result<Vec<u8>> {
    if num_h_metrics == 0 || num_h_metrics > num_glyphs || x_mins.len() != num_glyphs as usize {
        return Err(CodecError::malformed(CONTAINER, "metric counts do not match the glyph count"));
    }
    let mut reader = Reader::new(data, "transformed hmtx");
    let flags = reader.read_u8()?;
    if flags & !(PROPORTIONAL_LSBS_OMITTED | MONOSPACED_LSBS_OMITTED) != 0 {
        return Err(CodecError::malformed(CONTAINER, "reserved flag bits are set"));
    }
    if flags == 0 {
        return Err(CodecError::malformed(CONTAINER, "transform omits nothing"));
    }

    let advances = (0..num_h_metrics)
        .map(|_| reader.read_u16())
        .collect::<Result<Vec<_>>>()?;
    let (proportional_x_mins, monospaced_x_mins) = x_mins.split_at(num_h_metrics as usize);
    let lsbs = if flags & PROPORTIONAL_LSBS_OMITTED != 0 {
        proportional_x_mins.to_vec()
    } else {
        (0..num_h_metrics)
            .map(|_| reader.read_i16())
            .collect::<Result<_>>()?
    };
    let monospaced_lsbs = if flags & MONOSPACED_LSBS_OMITTED != 0 {
        monospaced_x_mins.to_vec()
    } else {
        (num_h_metrics..num_glyphs)
            .map(|_| reader.read_i16())
            .collect::<Result<_>>()?
    };

    let mut hmtx = Vec::with_capacity(4 * advances.len() + 2 * monospaced_lsbs.len());
    for (advance, lsb) in advances.into_iter().zip(lsbs) {
        hmtx.put_u16(advance);
        hmtx.put_i16(lsb);
    }
    for lsb in monospaced_lsbs {
        hmtx.put_i16(lsb);
    }
    Ok(hmtx)
}
