use byteorder::{BigEndian, ByteOrder, LittleEndian};

use crate::error::{Error, Result};

/// Longest gamma length accepted; ten 7-bit groups already cover a u64.
pub const MAX_GAMMA_BYTES: usize = 10;

/// Binary reader for savegame data
pub struct BinaryReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> BinaryReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Reader positioned at `pos`. Positions past the end read as empty.
    pub fn at(data: &'a [u8], pos: usize) -> Self {
        Self { data, pos }
    }

    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    pub fn skip(&mut self, n: usize) -> Result<()> {
        if self.remaining() < n {
            return Err(Error::UnexpectedEof);
        }
        self.pos += n;
        Ok(())
    }

    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        if self.remaining() < n {
            return Err(Error::UnexpectedEof);
        }
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        let v = *self.data.get(self.pos).ok_or(Error::UnexpectedEof)?;
        self.pos += 1;
        Ok(v)
    }

    /// Read a four byte chunk or envelope tag
    pub fn read_tag(&mut self) -> Result<[u8; 4]> {
        let bytes = self.read_bytes(4)?;
        Ok([bytes[0], bytes[1], bytes[2], bytes[3]])
    }

    pub fn read_u32_le(&mut self) -> Result<u32> {
        Ok(LittleEndian::read_u32(self.read_bytes(4)?))
    }

    pub fn read_u32_be(&mut self) -> Result<u32> {
        Ok(BigEndian::read_u32(self.read_bytes(4)?))
    }

    /// Read a gamma-coded length: little-endian groups of 7 bits, high bit
    /// set on every byte except the last. Values wider than a u64 fail with
    /// `GammaOverflow` instead of wrapping.
    pub fn read_gamma(&mut self) -> Result<u64> {
        let mut value = 0u64;
        for index in 0..MAX_GAMMA_BYTES {
            let byte = self.read_u8()?;
            let group = u64::from(byte & 0x7F);
            let shift = 7 * index as u32;
            let shifted = group << shift;
            if shifted >> shift != group {
                return Err(Error::GammaOverflow { max: MAX_GAMMA_BYTES });
            }
            value |= shifted;
            if byte & 0x80 == 0 {
                return Ok(value);
            }
        }
        Err(Error::GammaOverflow { max: MAX_GAMMA_BYTES })
    }

    /// Read remaining bytes
    pub fn read_remaining(&mut self) -> &'a [u8] {
        let start = self.pos.min(self.data.len());
        self.pos = self.data.len();
        &self.data[start..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_primitives() {
        let data = [0x01, 0x4F, 0x54, 0x54, 0x4E, 0x04, 0x03, 0x02, 0x01];
        let mut reader = BinaryReader::new(&data);

        assert_eq!(reader.read_u8().unwrap(), 0x01);
        assert_eq!(reader.read_u32_be().unwrap(), 0x4F54_544E);
        assert_eq!(reader.read_u32_le().unwrap(), 0x0102_0304);
        assert!(reader.is_empty());
        assert!(matches!(reader.read_u8(), Err(Error::UnexpectedEof)));
    }

    #[test]
    fn test_read_tag() {
        let mut reader = BinaryReader::new(b"VEHS\x28");
        assert_eq!(&reader.read_tag().unwrap(), b"VEHS");
        assert_eq!(reader.remaining(), 1);
    }

    #[test]
    fn test_read_gamma() {
        // Single byte
        let mut reader = BinaryReader::new(&[0x05]);
        assert_eq!(reader.read_gamma().unwrap(), 5);

        // 0x81 0x01 = 1 | (1 << 7)
        let mut reader = BinaryReader::new(&[0x81, 0x01, 0xAA]);
        assert_eq!(reader.read_gamma().unwrap(), 129);
        assert_eq!(reader.position(), 2);
    }

    #[test]
    fn test_read_gamma_unterminated() {
        let mut reader = BinaryReader::new(&[0x80, 0x80]);
        assert!(matches!(reader.read_gamma(), Err(Error::UnexpectedEof)));

        let data = [0xFF; 16];
        let mut reader = BinaryReader::new(&data);
        assert!(matches!(reader.read_gamma(), Err(Error::GammaOverflow { .. })));
    }

    #[test]
    fn test_read_gamma_wide_value() {
        // Ten groups whose last one only sets bit 63
        let mut data = vec![0xFF; 9];
        data.push(0x01);
        let mut reader = BinaryReader::new(&data);
        assert_eq!(reader.read_gamma().unwrap(), u64::MAX);

        // Bits above 63 in the last group must not be dropped
        let mut data = vec![0x81];
        data.extend_from_slice(&[0x80; 8]);
        data.push(0x02);
        let mut reader = BinaryReader::new(&data);
        assert!(matches!(reader.read_gamma(), Err(Error::GammaOverflow { .. })));
    }

    #[test]
    fn test_reader_at_past_end() {
        let data = [1, 2, 3];
        let mut reader = BinaryReader::at(&data, 10);
        assert_eq!(reader.remaining(), 0);
        assert!(reader.read_remaining().is_empty());
    }
}
