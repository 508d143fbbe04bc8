//! OpenTTD savegame snapshot decoder
//!
//! Turns the compressed savegame blob an OpenTTD server sends to joining
//! clients into a flat `MapSnapshot` of vehicles, stations, industries,
//! companies and map dimensions for monitoring tools.

pub mod codec;
pub mod config;
pub mod error;
pub mod state;

pub use error::{Error, Result};
pub use config::ParserConfig;
pub use codec::{
    CompressionFormat, ChunkRecord, LengthEncoding, ScanReport,
    MapParser, parse_map_data, resolve, scan,
};
pub use state::{
    MapSnapshot, Provenance, EntityKind, ExtractionStatus, ExtractionReport,
    ParsedVehicle, ParsedStation, ParsedIndustry, ParsedCompany,
    VehicleType, StationFacilities, Position,
};
