use std::fmt;
use std::io::Read;

use flate2::read::ZlibDecoder;
use xz2::read::XzDecoder;
use xz2::stream::Stream;

use super::BinaryReader;
use crate::error::{Error, Result};

/// Format tag plus the skipped sub-header
pub const ENVELOPE_HEADER_LEN: usize = 8;

pub const TAG_LZMA: u32 = u32::from_be_bytes(*b"OTTX");
pub const TAG_ZLIB: u32 = u32::from_be_bytes(*b"OTTZ");
pub const TAG_NONE: u32 = u32::from_be_bytes(*b"OTTN");
pub const TAG_LZO: u32 = u32::from_be_bytes(*b"OTTD");

/// Savegame compression, selected by the big-endian tag at offset 0
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionFormat {
    Lzma,
    Zlib,
    Uncompressed,
    /// Recognized but not supported
    Lzo,
    /// Any other tag; decoded as LZMA
    Unknown(u32),
}

impl CompressionFormat {
    pub fn from_tag(tag: u32) -> Self {
        match tag {
            TAG_LZMA => Self::Lzma,
            TAG_ZLIB => Self::Zlib,
            TAG_NONE => Self::Uncompressed,
            TAG_LZO => Self::Lzo,
            other => Self::Unknown(other),
        }
    }

    pub fn codec_name(&self) -> &'static str {
        match self {
            Self::Lzma | Self::Unknown(_) => "lzma",
            Self::Zlib => "zlib",
            Self::Uncompressed => "none",
            Self::Lzo => "lzo",
        }
    }
}

impl fmt::Display for CompressionFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown(tag) => write!(f, "unknown tag {:08X}", tag),
            other => f.write_str(other.codec_name()),
        }
    }
}

/// Strip the envelope header and decompress the payload.
///
/// Fails with `Error::Format` on blobs shorter than the header; codec
/// failures abort the whole parse.
pub fn resolve(blob: &[u8]) -> Result<Vec<u8>> {
    if blob.len() < ENVELOPE_HEADER_LEN {
        return Err(Error::Format { len: blob.len(), min: ENVELOPE_HEADER_LEN });
    }

    let mut reader = BinaryReader::new(blob);
    let format = CompressionFormat::from_tag(reader.read_u32_be()?);
    reader.skip(4)?;
    let payload = reader.read_remaining();

    match format {
        CompressionFormat::Lzma => {
            tracing::info!(payload_len = payload.len(), "decompressing LZMA savegame");
            decompress_lzma(payload)
        }
        CompressionFormat::Zlib => {
            tracing::info!(payload_len = payload.len(), "decompressing zlib savegame");
            decompress_zlib(payload)
        }
        CompressionFormat::Uncompressed => {
            tracing::info!(payload_len = payload.len(), "savegame is uncompressed");
            Ok(payload.to_vec())
        }
        CompressionFormat::Lzo => Err(Error::UnsupportedCodec { codec: "lzo" }),
        CompressionFormat::Unknown(tag) => {
            tracing::warn!(tag = %format!("{:08X}", tag), "unknown savegame tag, trying LZMA");
            decompress_lzma(payload)
        }
    }
}

fn decompress_lzma(payload: &[u8]) -> Result<Vec<u8>> {
    // Auto decoder accepts both .xz streams and legacy .lzma headers
    let stream = Stream::new_auto_decoder(u64::MAX, 0).map_err(|e| Error::Decompression {
        codec: "lzma",
        reason: e.to_string(),
    })?;
    let mut decoder = XzDecoder::new_stream(payload, stream);
    let mut out = Vec::new();
    decoder.read_to_end(&mut out).map_err(|e| Error::Decompression {
        codec: "lzma",
        reason: e.to_string(),
    })?;
    Ok(out)
}

fn decompress_zlib(payload: &[u8]) -> Result<Vec<u8>> {
    let mut decoder = ZlibDecoder::new(payload);
    let mut out = Vec::new();
    decoder.read_to_end(&mut out).map_err(|e| Error::Decompression {
        codec: "zlib",
        reason: e.to_string(),
    })?;
    Ok(out)
}
