//! Big-endian cursor reading and buffer writing helpers.

use crate::error::{CodecError, Result};

/// Bounds-checked big-endian reader over a byte slice.
#[derive(Debug, Clone)]
pub(crate) struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
    what: &'static str,
}

impl<'a> Reader<'a> {
    /// `what` names the structure being read and ends up in truncation errors.
    pub(crate) fn new(data: &'a [u8], what: &'static str) -> Self {
        Self { data, pos: 0, what }
    }

    pub(crate) fn at(data: &'a [u8], pos: usize, what: &'static str) -> Result<Self> {
        if pos > data.len() {
            return Err(CodecError::Truncated { what });
        }
        Ok(Self { data, pos, what })
    }

    pub(crate) fn pos(&self) -> usize {
        self.pos
    }

    #[cfg(test)]
    pub(crate) fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub(crate) fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|&end| end <= self.data.len())
            .ok_or(CodecError::Truncated { what: self.what })?;
        let bytes = &self.data[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    pub(crate) fn skip(&mut self, len: usize) -> Result<()> {
        self.read_bytes(len).map(|_| ())
    }

    pub(crate) fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_bytes(1)?[0])
    }

    pub(crate) fn read_u16(&mut self) -> Result<u16> {
        let b = self.read_bytes(2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    pub(crate) fn read_i16(&mut self) -> Result<i16> {
        Ok(self.read_u16()? as i16)
    }

    pub(crate) fn read_u32(&mut self) -> Result<u32> {
        let b = self.read_bytes(4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }
}

/// Big-endian append helpers for output buffers.
pub(crate) trait WriteBe {
    fn put_u8(&mut self, value: u8);
    fn put_u16(&mut self, value: u16);
    fn put_i16(&mut self, value: i16);
    fn put_u32(&mut self, value: u32);
    /// Zero-pads to the next multiple of four.
    fn pad4(&mut self);
}

impl WriteBe for Vec<u8> {
    fn put_u8(&mut self, value: u8) {
        self.push(value);
    }

    fn put_u16(&mut self, value: u16) {
        self.extend_from_slice(&value.to_be_bytes());
    }

    fn put_i16(&mut self, value: i16) {
        self.extend_from_slice(&value.to_be_bytes());
    }

    fn put_u32(&mut self, value: u32) {
        self.extend_from_slice(&value.to_be_bytes());
    }

    fn pad4(&mut self) {
        let padded = round4(self.len());
        self.resize(padded, 0);
    }
}

pub(crate) const fn round4(len: usize) -> usize {
    (len + 3) & !3
}

pub(crate) fn read_u16_at(data: &[u8], offset: usize, what: &'static str) -> Result<u16> {
    Reader::at(data, offset, what)?.read_u16()
}

pub(crate) fn write_u32_at(data: &mut [u8], offset: usize, value: u32) {
    data[offset..offset + 4].copy_from_slice(&value.to_be_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reader_reports_truncation_with_context() {
        let mut reader = Reader::new(&[0x12, 0x34, 0x56], "header");
        assert_eq!(reader.read_u16().unwrap(), 0x1234);
        match reader.read_u16() {
            Err(CodecError::Truncated { what }) => assert_eq!(what, "header"),
            other => panic!("expected truncation, got {other:?}"),
        }
        // A failed read does not move the cursor.
        assert_eq!(reader.pos(), 2);
        assert_eq!(reader.read_u8().unwrap(), 0x56);
    }

    #[test]
    fn pad4_rounds_up_only_when_needed() {
        let mut buf = vec![1u8; 5];
        buf.pad4();
        assert_eq!(buf.len(), 8);
        buf.pad4();
        assert_eq!(buf.len(), 8);
        assert_eq!(round4(0), 0);
        assert_eq!(round4(13), 16);
    }
}
