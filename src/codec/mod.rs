pub mod anchor;
pub mod chunk;
pub mod envelope;
pub mod estimate;
pub mod extract;
pub mod map_parser;
pub mod reader;
pub mod writer;

pub use reader::BinaryReader;
pub use writer::BinaryWriter;
pub use anchor::{find_chunk_anchor, ANCHOR_TAGS};
pub use chunk::{ChunkRecord, ChunkWalk, LengthEncoding, ScanReport, scan};
pub use envelope::{CompressionFormat, resolve};
pub use estimate::{count_vehicle_patterns, estimate_vehicles};
pub use extract::{Extractor, ExtractorOutcome, EXTRACTORS, extractor_for};
pub use map_parser::{MapParser, parse_map_data};
