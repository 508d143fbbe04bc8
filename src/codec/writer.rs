use super::chunk::LengthEncoding;

/// Binary writer for savegame fixtures and chunk headers
pub struct BinaryWriter {
    data: Vec<u8>,
}

impl BinaryWriter {
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { data: Vec::with_capacity(capacity) }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.data.extend_from_slice(bytes);
    }

    pub fn write_u8(&mut self, v: u8) {
        self.data.push(v);
    }

    pub fn write_tag(&mut self, tag: &[u8; 4]) {
        self.data.extend_from_slice(tag);
    }

    pub fn write_u32_le(&mut self, v: u32) {
        self.data.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_u32_be(&mut self, v: u32) {
        self.data.extend_from_slice(&v.to_be_bytes());
    }

    /// Write the canonical gamma coding of `v` (inverse of `read_gamma`)
    pub fn write_gamma(&mut self, mut v: u64) {
        loop {
            let group = (v & 0x7F) as u8;
            v >>= 7;
            if v == 0 {
                self.write_u8(group);
                return;
            }
            self.write_u8(group | 0x80);
        }
    }

    /// Write a chunk tag and its length header.
    ///
    /// `Byte` lengths must fit below 0x80, otherwise the type byte would be
    /// read back as a gamma marker.
    pub fn write_chunk_header(&mut self, tag: &[u8; 4], encoding: LengthEncoding, len: u32) {
        self.write_tag(tag);
        match encoding {
            LengthEncoding::Byte => {
                debug_assert!(len < 0x80, "byte length {len} collides with gamma marker");
                self.write_u8(len as u8);
            }
            LengthEncoding::Gamma => {
                self.write_u8(0x80);
                self.write_gamma(u64::from(len));
            }
            LengthEncoding::Extended => {
                self.write_u8(0xFF);
                self.write_u32_le(len);
            }
        }
    }

    /// Write a whole chunk: header followed by `body`
    pub fn write_chunk(&mut self, tag: &[u8; 4], encoding: LengthEncoding, body: &[u8]) {
        self.write_chunk_header(tag, encoding, body.len() as u32);
        self.write_bytes(body);
    }
}

impl Default for BinaryWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl From<BinaryWriter> for Vec<u8> {
    fn from(writer: BinaryWriter) -> Self {
        writer.into_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::reader::BinaryReader;
    use proptest::prelude::*;

    #[test]
    fn test_roundtrip_primitives() {
        let mut writer = BinaryWriter::new();
        writer.write_u8(0x42);
        writer.write_u32_be(0x4F54_545A);
        writer.write_u32_le(0xDEADBEEF);

        let data = writer.into_vec();
        let mut reader = BinaryReader::new(&data);

        assert_eq!(reader.read_u8().unwrap(), 0x42);
        assert_eq!(reader.read_u32_be().unwrap(), 0x4F54_545A);
        assert_eq!(reader.read_u32_le().unwrap(), 0xDEADBEEF);
    }

    #[test]
    fn test_gamma_known_encodings() {
        let cases: [(u64, &[u8]); 4] = [
            (0, &[0x00]),
            (127, &[0x7F]),
            (128, &[0x80, 0x01]),
            (1_000_000, &[0xC0, 0x84, 0x3D]),
        ];
        for (value, expected) in cases {
            let mut writer = BinaryWriter::new();
            writer.write_gamma(value);
            assert_eq!(writer.as_slice(), expected, "encoding of {value}");
        }
    }

    #[test]
    fn test_chunk_header_layouts() {
        let mut writer = BinaryWriter::new();
        writer.write_chunk_header(b"MAP ", LengthEncoding::Byte, 8);
        assert_eq!(writer.as_slice(), b"MAP \x08");

        let mut writer = BinaryWriter::new();
        writer.write_chunk_header(b"VEHS", LengthEncoding::Extended, 0x0102);
        assert_eq!(writer.as_slice(), b"VEHS\xFF\x02\x01\x00\x00");

        let mut writer = BinaryWriter::new();
        writer.write_chunk_header(b"STNS", LengthEncoding::Gamma, 300);
        assert_eq!(writer.as_slice(), b"STNS\x80\xAC\x02");
    }

    proptest! {
        #[test]
        fn gamma_decode_then_encode_reproduces_bytes(value in any::<u32>()) {
            let mut writer = BinaryWriter::new();
            writer.write_gamma(u64::from(value));
            let encoded = writer.into_vec();

            let mut reader = BinaryReader::new(&encoded);
            let decoded = reader.read_gamma().unwrap();
            prop_assert_eq!(decoded, u64::from(value));
            prop_assert!(reader.is_empty());

            let mut again = BinaryWriter::new();
            again.write_gamma(decoded);
            prop_assert_eq!(again.into_vec(), encoded);
        }
    }
}
