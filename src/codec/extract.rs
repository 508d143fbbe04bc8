//! Per-tag chunk decoders.
//!
//! Each recognized tag maps to one `Extractor` with the same signature, so
//! decoding a newly understood chunk means adding a row to `EXTRACTORS`.
//! Only `VEHS` and `MAP ` yield data today; the vehicle decode is a stride
//! heuristic that recovers type and owner but not the per-field telemetry.

use super::BinaryReader;
use crate::config::ParserConfig;
use crate::state::{
    EntityKind, ExtractionStatus, ParsedCompany, ParsedIndustry, ParsedStation, ParsedVehicle,
    VehicleType, MAX_COMPANIES, is_valid_company,
};

/// What one extractor recovered from one chunk body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractorOutcome {
    Vehicles(Vec<ParsedVehicle>),
    Stations(Vec<ParsedStation>),
    Industries(Vec<ParsedIndustry>),
    Companies(Vec<ParsedCompany>),
    MapSize { width: u32, height: u32 },
    /// The chunk was accepted but its layout is not decoded
    NotImplemented,
    /// The chunk was located but its body was too short to read
    Empty,
}

impl ExtractorOutcome {
    pub fn status(&self) -> ExtractionStatus {
        match self {
            Self::Vehicles(_) => ExtractionStatus::CountOnly,
            Self::Stations(_) | Self::Industries(_) | Self::Companies(_) => {
                ExtractionStatus::Decoded
            }
            Self::MapSize { .. } => ExtractionStatus::Decoded,
            Self::NotImplemented | Self::Empty => ExtractionStatus::NotImplemented,
        }
    }
}

pub type ExtractFn = fn(&[u8], &ParserConfig) -> ExtractorOutcome;

/// A dispatch-table row binding a chunk tag to its decoder
#[derive(Debug, Clone, Copy)]
pub struct Extractor {
    pub tag: [u8; 4],
    pub kind: EntityKind,
    pub extract: ExtractFn,
}

pub static EXTRACTORS: [Extractor; 5] = [
    Extractor { tag: *b"VEHS", kind: EntityKind::Vehicles, extract: extract_vehicles },
    Extractor { tag: *b"STNS", kind: EntityKind::Stations, extract: extract_stations },
    Extractor { tag: *b"INDS", kind: EntityKind::Industries, extract: extract_industries },
    Extractor { tag: *b"PLYR", kind: EntityKind::Companies, extract: extract_companies },
    Extractor { tag: *b"MAP ", kind: EntityKind::Map, extract: extract_map_size },
];

pub fn extractor_for(tag: &[u8; 4]) -> Option<&'static Extractor> {
    EXTRACTORS.iter().find(|e| &e.tag == tag)
}

/// Walk the body in fixed strides; byte 0 folds into a vehicle type and
/// byte 1 into an owning company. A trailing partial stride is dropped, but
/// a body of exactly one stride still yields a vehicle.
pub fn extract_vehicles(body: &[u8], config: &ParserConfig) -> ExtractorOutcome {
    let stride = config.vehicle_stride.max(2);
    let mut vehicles = Vec::with_capacity(body.len() / stride);

    for record in body.chunks_exact(stride) {
        let vehicle_type = VehicleType::from_byte_mod(record[0]);
        let company_id = record[1] % MAX_COMPANIES;
        // Only reachable if the owner byte stops being reduced above
        if !is_valid_company(company_id) {
            continue;
        }
        vehicles.push(ParsedVehicle::new(vehicles.len() as u32, vehicle_type, company_id));
    }

    tracing::trace!(
        body_len = body.len(),
        vehicles = vehicles.len(),
        "decoded vehicle strides"
    );
    ExtractorOutcome::Vehicles(vehicles)
}

pub fn extract_stations(body: &[u8], _config: &ParserConfig) -> ExtractorOutcome {
    tracing::debug!(len = body.len(), "station chunk not decoded");
    ExtractorOutcome::NotImplemented
}

pub fn extract_industries(body: &[u8], _config: &ParserConfig) -> ExtractorOutcome {
    tracing::debug!(len = body.len(), "industry chunk not decoded");
    ExtractorOutcome::NotImplemented
}

pub fn extract_companies(body: &[u8], _config: &ParserConfig) -> ExtractorOutcome {
    tracing::debug!(len = body.len(), "company chunk not decoded");
    ExtractorOutcome::NotImplemented
}

/// Width and height as two little-endian u32s
pub fn extract_map_size(body: &[u8], _config: &ParserConfig) -> ExtractorOutcome {
    let mut reader = BinaryReader::new(body);
    match (reader.read_u32_le(), reader.read_u32_le()) {
        (Ok(width), Ok(height)) => {
            tracing::info!(width, height, "parsed map size");
            ExtractorOutcome::MapSize { width, height }
        }
        _ => ExtractorOutcome::Empty,
    }
}
