use std::collections::BTreeSet;

use serde::Serialize;

use super::vehicle::Position;

pub type CargoType = u8;

/// An industry read from the `INDS` chunk
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedIndustry {
    pub id: u32,
    pub industry_type: u8,
    pub name: String,
    pub position: Position,
    pub production_rate: Vec<u32>,
    pub last_month_production: Vec<u32>,
    pub accepts_cargo: BTreeSet<CargoType>,
    pub produces_cargo: BTreeSet<CargoType>,
}
