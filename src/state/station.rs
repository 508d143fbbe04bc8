use bitflags::bitflags;
use serde::Serialize;

use super::company::CompanyId;
use super::vehicle::Position;

bitflags! {
    /// Facilities a station offers
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
    pub struct StationFacilities: u8 {
        const RAIL = 1;
        const AIRPORT = 2;
        const TRUCK = 4;
        const BUS = 8;
        const DOCK = 16;
    }
}

/// A station read from the `STNS` chunk
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedStation {
    pub id: u32,
    pub company_id: CompanyId,
    pub name: String,
    pub position: Position,
    pub facilities: StationFacilities,
    /// Days since year 0
    pub build_date: u32,
}
