use serde::Serialize;

use super::company::CompanyId;

/// Unique within one snapshot
pub type VehicleId = u32;

/// Game vehicle categories, in save-file order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[repr(u8)]
pub enum VehicleType {
    Train = 0,
    Road = 1,
    Ship = 2,
    Aircraft = 3,
    Effect = 4,
    Disaster = 5,
}

impl VehicleType {
    pub const COUNT: u8 = 6;

    /// Fold any byte into a type by taking it modulo the type count
    pub fn from_byte_mod(v: u8) -> Self {
        match v % Self::COUNT {
            0 => Self::Train,
            1 => Self::Road,
            2 => Self::Ship,
            3 => Self::Aircraft,
            4 => Self::Effect,
            _ => Self::Disaster,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Train => "train",
            Self::Road => "road",
            Self::Ship => "ship",
            Self::Aircraft => "aircraft",
            Self::Effect => "effect",
            Self::Disaster => "disaster",
        }
    }
}

/// Tile coordinates plus height
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Position {
    pub x: u32,
    pub y: u32,
    pub z: u8,
}

/// A vehicle read from the `VEHS` chunk.
///
/// Only `vehicle_type` and `company_id` come from the save data; the
/// remaining fields carry the placeholder values from `ParsedVehicle::new`
/// until the record layout is decoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedVehicle {
    pub id: VehicleId,
    pub vehicle_type: VehicleType,
    pub company_id: CompanyId,
    pub engine_type: u16,
    pub position: Position,
    pub speed: u16,
    pub profit_this_year: i64,
    pub profit_last_year: i64,
    pub running_cost: i64,
    pub build_year: i32,
    /// 0..=100
    pub reliability: u8,
    pub cargo_type: u8,
    pub cargo_capacity: u16,
    pub cargo_count: u16,
}

impl ParsedVehicle {
    pub const PLACEHOLDER_BUILD_YEAR: i32 = 1950;
    pub const PLACEHOLDER_RELIABILITY: u8 = 100;

    pub fn new(id: VehicleId, vehicle_type: VehicleType, company_id: CompanyId) -> Self {
        Self {
            id,
            vehicle_type,
            company_id,
            engine_type: 0,
            position: Position::default(),
            speed: 0,
            profit_this_year: 0,
            profit_last_year: 0,
            running_cost: 0,
            build_year: Self::PLACEHOLDER_BUILD_YEAR,
            reliability: Self::PLACEHOLDER_RELIABILITY,
            cargo_type: 0,
            cargo_capacity: 0,
            cargo_count: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_from_byte_mod() {
        assert_eq!(VehicleType::from_byte_mod(0), VehicleType::Train);
        assert_eq!(VehicleType::from_byte_mod(6), VehicleType::Train);
        assert_eq!(VehicleType::from_byte_mod(11), VehicleType::Disaster);
        assert_eq!(VehicleType::from_byte_mod(255), VehicleType::Aircraft);
    }

    #[test]
    fn test_placeholder_defaults() {
        let v = ParsedVehicle::new(7, VehicleType::Road, 3);
        assert_eq!(v.build_year, 1950);
        assert_eq!(v.reliability, 100);
        assert_eq!(v.position, Position::default());
        assert_eq!(v.speed, 0);
        assert_eq!(v.cargo_count, 0);
    }
}
