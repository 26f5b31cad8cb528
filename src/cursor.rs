use std::fmt;

use crate::error::{FontError, FontResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endian {
    Big,
    Little,
}

/// A seekable reader over a byte buffer.
///
/// All table codecs are built exclusively on this primitive; nothing else
/// indexes raw font bytes directly. The position stack exists for
/// offset-indirected sub-structures: `push_position` jumps to the
/// sub-structure and `pop_position` returns to the prior location.
pub struct ByteCursor<'a> {
    buffer: &'a [u8],
    position: usize,
    endian: Endian,
    saved: Vec<usize>,
}

impl fmt::Debug for ByteCursor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ByteCursor")
            .field("position", &self.position)
            .field("buffer", &format!("[ {} bytes ]", self.buffer.len()))
            .finish()
    }
}

impl<'a> ByteCursor<'a> {
    pub fn new(buffer: &'a [u8]) -> Self {
        Self::with_endian(buffer, Endian::Big)
    }

    pub fn with_endian(buffer: &'a [u8], endian: Endian) -> Self {
        Self {
            buffer,
            position: 0,
            endian,
            saved: Vec::new(),
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn remaining(&self) -> usize {
        self.buffer.len() - self.position
    }

    pub fn is_at_end(&self) -> bool {
        self.position == self.buffer.len()
    }

    pub fn seek(&mut self, offset: usize) -> FontResult<()> {
        if offset > self.buffer.len() {
            return Err(FontError::OutOfBounds {
                offset,
                needed: 0,
                len: self.buffer.len(),
            });
        }

        self.position = offset;

        Ok(())
    }

    /// Save the current position and jump to `offset`.
    pub fn push_position(&mut self, offset: usize) -> FontResult<()> {
        let current = self.position;
        self.seek(offset)?;
        self.saved.push(current);

        Ok(())
    }

    /// Return to the position saved by the matching `push_position`.
    pub fn pop_position(&mut self) {
        if let Some(position) = self.saved.pop() {
            self.position = position;
        }
    }

    fn take(&mut self, n: usize) -> FontResult<&'a [u8]> {
        match self.buffer.get(self.position..self.position + n) {
            Some(bytes) => {
                self.position += n;
                Ok(bytes)
            }
            None => Err(FontError::OutOfBounds {
                offset: self.position,
                needed: n,
                len: self.buffer.len(),
            }),
        }
    }

    fn peek_slice(&self, n: usize) -> FontResult<&'a [u8]> {
        self.buffer
            .get(self.position..self.position + n)
            .ok_or(FontError::OutOfBounds {
                offset: self.position,
                needed: n,
                len: self.buffer.len(),
            })
    }

    pub fn read_bytes(&mut self, n: usize) -> FontResult<&'a [u8]> {
        self.take(n)
    }

    pub fn read_u8(&mut self) -> FontResult<u8> {
        Ok(self.take(1)?[0])
    }

    pub fn read_i8(&mut self) -> FontResult<i8> {
        Ok(self.take(1)?[0] as i8)
    }

    pub fn read_u16(&mut self) -> FontResult<u16> {
        let b = self.take(2)?;

        Ok(match self.endian {
            Endian::Big => u16::from_be_bytes([b[0], b[1]]),
            Endian::Little => u16::from_le_bytes([b[0], b[1]]),
        })
    }

    pub fn read_i16(&mut self) -> FontResult<i16> {
        Ok(self.read_u16()? as i16)
    }

    pub fn read_u32(&mut self) -> FontResult<u32> {
        let b = self.take(4)?;

        Ok(match self.endian {
            Endian::Big => u32::from_be_bytes([b[0], b[1], b[2], b[3]]),
            Endian::Little => u32::from_le_bytes([b[0], b[1], b[2], b[3]]),
        })
    }

    pub fn read_i32(&mut self) -> FontResult<i32> {
        Ok(self.read_u32()? as i32)
    }

    pub fn read_u64(&mut self) -> FontResult<u64> {
        let b = self.take(8)?;

        Ok(match self.endian {
            Endian::Big => u64::from_be_bytes([b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]]),
            Endian::Little => u64::from_le_bytes([b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]]),
        })
    }

    pub fn read_i64(&mut self) -> FontResult<i64> {
        Ok(self.read_u64()? as i64)
    }

    pub fn peek_u16(&self) -> FontResult<u16> {
        let b = self.peek_slice(2)?;

        Ok(match self.endian {
            Endian::Big => u16::from_be_bytes([b[0], b[1]]),
            Endian::Little => u16::from_le_bytes([b[0], b[1]]),
        })
    }

    pub fn peek_u32(&self) -> FontResult<u32> {
        let b = self.peek_slice(4)?;

        Ok(match self.endian {
            Endian::Big => u32::from_be_bytes([b[0], b[1], b[2], b[3]]),
            Endian::Little => u32::from_le_bytes([b[0], b[1], b[2], b[3]]),
        })
    }
}

/// The write half of the cursor: appends fixed-width integers to a growing
/// buffer, pads to table boundaries, and backfills placeholders.
#[derive(Debug, Default)]
pub struct ByteWriter {
    buffer: Vec<u8>,
    endian: Endian,
}

impl Default for Endian {
    fn default() -> Self {
        Endian::Big
    }
}

impl ByteWriter {
    pub fn new() -> Self {
        Self::with_endian(Endian::Big)
    }

    pub fn with_endian(endian: Endian) -> Self {
        Self {
            buffer: Vec::new(),
            endian,
        }
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn bytes(&self) -> &[u8] {
        &self.buffer
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    pub fn write_u8(&mut self, value: u8) {
        self.buffer.push(value);
    }

    pub fn write_i8(&mut self, value: i8) {
        self.buffer.push(value as u8);
    }

    pub fn write_u16(&mut self, value: u16) {
        match self.endian {
            Endian::Big => self.buffer.extend_from_slice(&value.to_be_bytes()),
            Endian::Little => self.buffer.extend_from_slice(&value.to_le_bytes()),
        }
    }

    pub fn write_i16(&mut self, value: i16) {
        self.write_u16(value as u16);
    }

    pub fn write_u32(&mut self, value: u32) {
        match self.endian {
            Endian::Big => self.buffer.extend_from_slice(&value.to_be_bytes()),
            Endian::Little => self.buffer.extend_from_slice(&value.to_le_bytes()),
        }
    }

    pub fn write_i32(&mut self, value: i32) {
        self.write_u32(value as u32);
    }

    pub fn write_u64(&mut self, value: u64) {
        match self.endian {
            Endian::Big => self.buffer.extend_from_slice(&value.to_be_bytes()),
            Endian::Little => self.buffer.extend_from_slice(&value.to_le_bytes()),
        }
    }

    pub fn write_i64(&mut self, value: i64) {
        self.write_u64(value as u64);
    }

    /// Zero-pad to the next 4-byte boundary.
    pub fn pad_to_word_boundary(&mut self) {
        while self.buffer.len() % 4 != 0 {
            self.buffer.push(0);
        }
    }

    /// Overwrite 4 bytes at `offset` with `value`.
    ///
    /// Used to backfill values that are only known after later data has
    /// been written, e.g. head's checksum adjustment.
    pub fn patch_u32(&mut self, offset: usize, value: u32) -> FontResult<()> {
        let bytes = match self.endian {
            Endian::Big => value.to_be_bytes(),
            Endian::Little => value.to_le_bytes(),
        };

        match self.buffer.get_mut(offset..offset + 4) {
            Some(slot) => {
                slot.copy_from_slice(&bytes);
                Ok(())
            }
            None => Err(FontError::OutOfBounds {
                offset,
                needed: 4,
                len: self.buffer.len(),
            }),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn read_primitives_big_endian() {
        let mut cursor = ByteCursor::new(&[0x01, 0x02, 0x03, 0x04, 0xFF, 0xFE]);

        assert_eq!(cursor.read_u16().unwrap(), 0x0102);
        assert_eq!(cursor.read_u16().unwrap(), 0x0304);
        assert_eq!(cursor.read_i16().unwrap(), -2);
        assert!(cursor.is_at_end());
    }

    #[test]
    fn out_of_bounds_read() {
        let mut cursor = ByteCursor::new(&[0x01, 0x02]);

        assert!(matches!(
            cursor.read_u32(),
            Err(FontError::OutOfBounds {
                offset: 0,
                needed: 4,
                len: 2,
            })
        ));
        // a failed read does not advance
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn push_pop_position() {
        let mut cursor = ByteCursor::new(&[0x00, 0x01, 0x02, 0x03]);

        cursor.read_u16().unwrap();
        cursor.push_position(3).unwrap();
        assert_eq!(cursor.read_u8().unwrap(), 0x03);
        cursor.pop_position();
        assert_eq!(cursor.position(), 2);
    }

    #[test]
    fn peek_does_not_consume() {
        let cursor = ByteCursor::new(&[0xAB, 0xCD]);

        assert_eq!(cursor.peek_u16().unwrap(), 0xABCD);
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn writer_pads_and_patches() {
        let mut writer = ByteWriter::new();

        writer.write_u16(0xBEEF);
        writer.pad_to_word_boundary();
        assert_eq!(writer.len(), 4);

        writer.write_u32(0);
        writer.patch_u32(4, 0xDEADBEEF).unwrap();
        assert_eq!(writer.bytes(), &[0xBE, 0xEF, 0, 0, 0xDE, 0xAD, 0xBE, 0xEF]);
    }
}
