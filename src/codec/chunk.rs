use serde::Serialize;

use super::anchor::find_chunk_anchor;
use super::BinaryReader;
use crate::config::ParserConfig;
use crate::error::Result;

/// Tag plus type byte
pub const CHUNK_HEADER_MIN: usize = 5;

/// How a chunk's body length was stored after the tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LengthEncoding {
    /// The type byte is the length
    Byte,
    /// Base-128 continuation bytes follow a type byte with the high bit set
    Gamma,
    /// Type byte 0xFF, then a little-endian u32
    Extended,
}

/// A located, bounds-checked chunk span inside the decompressed stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkRecord {
    pub tag: [u8; 4],
    pub length_encoding: LengthEncoding,
    pub tag_offset: usize,
    pub body_offset: usize,
    pub body_length: usize,
}

impl ChunkRecord {
    /// Tag as text. Accepted tags are always ASCII.
    pub fn tag_str(&self) -> &str {
        std::str::from_utf8(&self.tag).unwrap_or("????")
    }

    pub fn end(&self) -> usize {
        self.body_offset + self.body_length
    }

    pub fn body<'a>(&self, stream: &'a [u8]) -> &'a [u8] {
        &stream[self.body_offset..self.end()]
    }
}

/// Everything one walk over a stream produced
#[derive(Debug, Clone, Default)]
pub struct ScanReport {
    pub anchor: Option<usize>,
    pub start: usize,
    pub records: Vec<ChunkRecord>,
    /// Cumulative single-byte resync steps
    pub bytes_stepped: usize,
    /// The walk hit the resync limit rather than the end of the stream
    pub aborted: bool,
}

/// Walk every chunk reachable from the anchor and collect the records.
pub fn scan(stream: &[u8], config: &ParserConfig) -> ScanReport {
    let mut walk = ChunkWalk::new(stream, config);
    let records: Vec<ChunkRecord> = walk.by_ref().collect();
    ScanReport {
        anchor: walk.anchor(),
        start: walk.start(),
        records,
        bytes_stepped: walk.bytes_stepped(),
        aborted: walk.aborted(),
    }
}

/// Iterator over the chunks of a decompressed savegame.
///
/// Corrupt tags and implausible lengths are skipped one byte at a time.
/// The total number of such steps is capped by `walk_limit`, so the walk
/// always terminates.
pub struct ChunkWalk<'a> {
    stream: &'a [u8],
    anchor: Option<usize>,
    start: usize,
    offset: usize,
    bytes_stepped: usize,
    walk_limit: usize,
    max_chunk_len: usize,
    aborted: bool,
    finished: bool,
}

impl<'a> ChunkWalk<'a> {
    pub fn new(stream: &'a [u8], config: &ParserConfig) -> Self {
        let anchor = find_chunk_anchor(stream);
        match anchor {
            Some(offset) => tracing::info!(offset, "found chunk anchor"),
            None => tracing::warn!("no chunk anchor found, walking from offset 0"),
        }
        let start = anchor.unwrap_or(0);
        Self {
            stream,
            anchor,
            start,
            offset: start,
            bytes_stepped: 0,
            walk_limit: config.walk_limit,
            max_chunk_len: config.max_chunk_len,
            aborted: false,
            finished: false,
        }
    }

    pub fn anchor(&self) -> Option<usize> {
        self.anchor
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn bytes_stepped(&self) -> usize {
        self.bytes_stepped
    }

    pub fn aborted(&self) -> bool {
        self.aborted
    }

    fn step(&mut self) {
        if self.bytes_stepped >= self.walk_limit {
            tracing::debug!(
                offset = self.offset,
                stepped = self.bytes_stepped,
                "chunk walk exceeded resync limit"
            );
            self.aborted = true;
            self.finished = true;
            return;
        }
        self.offset += 1;
        self.bytes_stepped += 1;
    }

    fn read_header(&self) -> Result<(LengthEncoding, usize, u64)> {
        let mut reader = BinaryReader::at(self.stream, self.offset);
        reader.skip(4)?;
        let type_byte = reader.read_u8()?;
        let (encoding, length) = if type_byte == 0xFF {
            (LengthEncoding::Extended, u64::from(reader.read_u32_le()?))
        } else if type_byte & 0x80 != 0 {
            (LengthEncoding::Gamma, reader.read_gamma()?)
        } else {
            (LengthEncoding::Byte, u64::from(type_byte))
        };
        Ok((encoding, reader.position(), length))
    }

    fn accept(&self, tag: [u8; 4]) -> Option<ChunkRecord> {
        let (length_encoding, body_offset, length) = match self.read_header() {
            Ok(header) => header,
            Err(e) => {
                tracing::debug!(offset = self.offset, error = %e, "unreadable chunk header");
                return None;
            }
        };
        if length > self.max_chunk_len as u64 {
            tracing::debug!(offset = self.offset, length, "chunk length over cap");
            return None;
        }
        let body_length = length as usize;
        if body_offset + body_length > self.stream.len() {
            tracing::debug!(offset = self.offset, length, "chunk body past end of stream");
            return None;
        }
        Some(ChunkRecord {
            tag,
            length_encoding,
            tag_offset: self.offset,
            body_offset,
            body_length,
        })
    }
}

impl Iterator for ChunkWalk<'_> {
    type Item = ChunkRecord;

    fn next(&mut self) -> Option<ChunkRecord> {
        while !self.finished {
            if self.offset + CHUNK_HEADER_MIN > self.stream.len() {
                self.finished = true;
                break;
            }
            let mut tag = [0u8; 4];
            tag.copy_from_slice(&self.stream[self.offset..self.offset + 4]);

            if tag == [0u8; 4] {
                tracing::debug!(offset = self.offset, "zero tag ends chunk walk");
                self.finished = true;
                break;
            }
            if !tag.is_ascii() {
                tracing::debug!(offset = self.offset, "non-ASCII tag byte");
                self.step();
                continue;
            }

            match self.accept(tag) {
                Some(record) => {
                    tracing::debug!(
                        tag = record.tag_str(),
                        offset = record.tag_offset,
                        len = record.body_length,
                        "found chunk"
                    );
                    self.offset = record.end();
                    return Some(record);
                }
                None => self.step(),
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::BinaryWriter;
    use proptest::prelude::*;

    fn scan_default(stream: &[u8]) -> ScanReport {
        scan(stream, &ParserConfig::default())
    }

    #[test]
    fn test_byte_length_chunk() {
        let report = scan_default(b"VEHS\x03xyz");
        assert_eq!(report.records.len(), 1);
        let record = report.records[0];
        assert_eq!(record.tag_str(), "VEHS");
        assert_eq!(record.length_encoding, LengthEncoding::Byte);
        assert_eq!(record.body_offset, 5);
        assert_eq!(record.body(b"VEHS\x03xyz"), b"xyz");
        assert!(!report.aborted);
    }

    #[test]
    fn test_gamma_length_chunk() {
        let body = vec![0x11u8; 300];
        let mut writer = BinaryWriter::new();
        writer.write_chunk(b"STNS", LengthEncoding::Gamma, &body);
        let stream = writer.into_vec();

        let report = scan_default(&stream);
        assert_eq!(report.records.len(), 1);
        let record = report.records[0];
        assert_eq!(record.length_encoding, LengthEncoding::Gamma);
        assert_eq!(record.body_offset, 7);
        assert_eq!(record.body_length, 300);
        assert_eq!(record.body(&stream), &body[..]);
    }

    #[test]
    fn test_extended_length_chunk() {
        let body = vec![0x22u8; 200];
        let mut writer = BinaryWriter::new();
        writer.write_chunk(b"PLYR", LengthEncoding::Extended, &body);
        writer.write_chunk(b"MAP ", LengthEncoding::Byte, &[0; 8]);
        let stream = writer.into_vec();

        let report = scan_default(&stream);
        let tags: Vec<&str> = report.records.iter().map(|r| r.tag_str()).collect();
        assert_eq!(tags, ["PLYR", "MAP "]);
        assert_eq!(report.records[0].body_offset, 9);
        assert_eq!(report.records[0].body_length, 200);
        assert_eq!(report.bytes_stepped, 0);
    }

    #[test]
    fn test_walk_starts_at_anchor() {
        let mut writer = BinaryWriter::new();
        writer.write_bytes(&[0xAB; 17]);
        writer.write_chunk(b"INDS", LengthEncoding::Byte, b"abc");
        let stream = writer.into_vec();

        let report = scan_default(&stream);
        assert_eq!(report.anchor, Some(17));
        assert_eq!(report.start, 17);
        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0].tag_offset, 17);
    }

    #[test]
    fn test_non_ascii_byte_is_skipped() {
        let mut writer = BinaryWriter::new();
        writer.write_u8(0xC3);
        writer.write_chunk(b"MAP ", LengthEncoding::Byte, &[1, 0, 0, 0, 2, 0, 0, 0]);
        let stream = writer.into_vec();

        let report = scan_default(&stream);
        assert_eq!(report.anchor, None);
        assert_eq!(report.bytes_stepped, 1);
        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0].tag_offset, 1);
    }

    #[test]
    fn test_zero_tag_ends_walk() {
        let report = scan_default(b"\0\0\0\0\x03MAP \x08\0\0\0\0\0\0\0\0");
        assert!(report.records.is_empty());
        assert_eq!(report.bytes_stepped, 0);
        assert!(!report.aborted);
    }

    #[test]
    fn test_oversized_chunk_rejected() {
        let mut writer = BinaryWriter::with_capacity(2_000_016);
        writer.write_chunk_header(b"VEHS", LengthEncoding::Extended, 2_000_000);
        writer.write_bytes(&vec![0x01; 2_000_000]);
        let stream = writer.into_vec();

        let report = scan_default(&stream);
        assert!(report.records.iter().all(|r| &r.tag != b"VEHS"));
        assert!(report.bytes_stepped >= 1);
    }

    #[test]
    fn test_overlong_gamma_rejected() {
        // 1 + 2 * 2^63 does not fit a u64 and must not wrap to a tiny length
        let mut stream = b"VEHS\x80".to_vec();
        stream.push(0x81);
        stream.extend_from_slice(&[0x80; 8]);
        stream.push(0x02);
        stream.extend_from_slice(&[0xAA; 4]);

        let report = scan_default(&stream);
        assert!(report.records.is_empty());
        assert!(report.bytes_stepped >= 1);
        assert!(!report.aborted);
    }

    #[test]
    fn test_body_past_end_rejected() {
        let report = scan_default(b"VEHS\x10short");
        assert!(report.records.iter().all(|r| &r.tag != b"VEHS"));
    }

    #[test]
    fn test_noise_hits_walk_limit() {
        let stream = vec![0xFFu8; 200_000];
        let report = scan_default(&stream);
        assert!(report.records.is_empty());
        assert!(report.aborted);
        assert_eq!(report.bytes_stepped, 50_000);
    }

    #[test]
    fn test_custom_walk_limit() {
        let config = ParserConfig { walk_limit: 10, ..ParserConfig::default() };
        let report = scan(&[0x90u8; 1024], &config);
        assert!(report.aborted);
        assert_eq!(report.bytes_stepped, 10);
    }

    fn anchor_tag() -> impl Strategy<Value = [u8; 4]> {
        prop_oneof![
            Just(*b"VEHS"),
            Just(*b"STNS"),
            Just(*b"INDS"),
            Just(*b"PLYR"),
        ]
    }

    proptest! {
        #[test]
        fn byte_length_chunk_is_located(
            tag in anchor_tag(),
            body in proptest::collection::vec(any::<u8>(), 0..0x80),
        ) {
            let mut writer = BinaryWriter::new();
            writer.write_chunk(&tag, LengthEncoding::Byte, &body);
            let stream = writer.into_vec();

            let report = scan_default(&stream);
            prop_assert_eq!(report.records.len(), 1);
            let record = report.records[0];
            prop_assert_eq!(record.body_length, body.len());
            prop_assert_eq!(record.body(&stream), &body[..]);
        }

        #[test]
        fn walk_terminates_within_limit(
            noise in proptest::collection::vec(any::<u8>(), 0..8192),
            walk_limit in 0usize..2048,
        ) {
            let config = ParserConfig { walk_limit, ..ParserConfig::default() };
            let report = scan(&noise, &config);
            prop_assert!(report.bytes_stepped <= walk_limit);
            for record in &report.records {
                prop_assert!(record.end() <= noise.len());
                prop_assert!(record.body_length <= config.max_chunk_len);
            }
        }
    }
}
