//! WOFF2 variable-length integers: `UIntBase128` and `255UInt16`.

use crate::error::{CodecError, Result};
use crate::io::{Reader, WriteBe};

const CONTAINER: &str = "woff2";

const ONE_MORE_BYTE_CODE1: u8 = 255;
const ONE_MORE_BYTE_CODE2: u8 = 254;
const WORD_CODE: u8 = 253;
const LOWEST_UCODE: u16 = 253;

pub(crate) fn read_base128(reader: &mut Reader<'_>) -> Result<u32> {
    let mut value: u32 = 0;
    for i in 0..5 {
        let byte = reader.read_u8()?;
        if i == 0 && byte == 0x80 {
            return Err(CodecError::malformed(CONTAINER, "UIntBase128 has a leading zero"));
        }
        if value & 0xFE00_0000 != 0 {
            return Err(CodecError::malformed(CONTAINER, "UIntBase128 overflows 32 bits"));
        }
        value = (value << 7) | u32::from(byte & 0x7f);
        if byte & 0x80 == 0 {
            return Ok(value);
        }
    }
    Err(CodecError::malformed(CONTAINER, "UIntBase128 is longer than five bytes"))
}

pub(crate) fn write_base128(out: &mut Vec<u8>, value: u32) {
    let mut size = 1;
    let mut rest = value >> 7;
    while rest != 0 {
        size += 1;
        rest >>= 7;
    }
    for i in (0..size).rev() {
        let mut byte = ((value >> (7 * i)) & 0x7f) as u8;
        if i != 0 {
            byte |= 0x80;
        }
        out.put_u8(byte);
    }
}

pub(crate) fn read_255_u16(reader: &mut Reader<'_>) -> Result<u16> {
    let code = reader.read_u8()?;
    Ok(match code {
        WORD_CODE => reader.read_u16()?,
        ONE_MORE_BYTE_CODE1 => u16::from(reader.read_u8()?) + LOWEST_UCODE,
        ONE_MORE_BYTE_CODE2 => u16::from(reader.read_u8()?) + LOWEST_UCODE * 2,
        _ => u16::from(code),
    })
}

pub(crate) fn write_255_u16(out: &mut Vec<u8>, value: u16) {
    if value < LOWEST_UCODE {
        out.put_u8(value as u8);
    } else if value < LOWEST_UCODE * 2 {
        out.put_u8(ONE_MORE_BYTE_CODE1);
        out.put_u8((value - LOWEST_UCODE) as u8);
    } else if value < LOWEST_UCODE * 2 + 256 {
        out.put_u8(ONE_MORE_BYTE_CODE2);
        out.put_u8((value - LOWEST_UCODE * 2) as u8);
    } else {
        out.put_u8(WORD_CODE);
        out.put_u16(value);
    }
}
