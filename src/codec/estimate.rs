//! Degraded-mode vehicle estimate for streams the chunk walk cannot read.
//!
//! Counts little-endian words that look like company ids and turns the
//! count into an order-of-magnitude fleet size. The synthesized vehicles
//! carry no real data beyond their number.

use byteorder::{ByteOrder, LittleEndian};

use crate::config::ParserConfig;
use crate::state::{ParsedVehicle, VehicleType};

/// Bytes that must follow a candidate word for it to count
const PATTERN_TAIL: usize = 16;

/// Words below this value could be company ids
const COMPANY_LIKE_LIMIT: u32 = 16;

/// Number of 4-byte strides whose value looks like a company id
pub fn count_vehicle_patterns(stream: &[u8]) -> usize {
    let end = stream.len().saturating_sub(4);
    (0..end)
        .step_by(4)
        .filter(|&offset| {
            LittleEndian::read_u32(&stream[offset..offset + 4]) < COMPANY_LIKE_LIMIT
                && offset + PATTERN_TAIL < stream.len()
        })
        .count()
}

/// Synthesize round-robin vehicles sized by the pattern count
pub fn estimate_vehicles(stream: &[u8], config: &ParserConfig) -> Vec<ParsedVehicle> {
    let patterns = count_vehicle_patterns(stream);
    let divisor = config.estimate_divisor.max(1);
    let count = (patterns / divisor).min(config.estimate_cap);
    let type_cycle = config.estimate_type_cycle.clamp(1, VehicleType::COUNT);
    let company_cycle = config.estimate_company_cycle.max(1);

    tracing::info!(patterns, estimated = count, "estimated vehicles from raw stream");

    (0..count)
        .map(|i| {
            let vehicle_type = VehicleType::from_byte_mod((i % type_cycle as usize) as u8);
            let company_id = (i % company_cycle as usize) as u8;
            ParsedVehicle::new(i as u32, vehicle_type, company_id)
        })
        .collect()
}
