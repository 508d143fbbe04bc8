use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::Serialize;

use super::company::{CompanyId, ParsedCompany};
use super::industry::ParsedIndustry;
use super::station::ParsedStation;
use super::vehicle::{ParsedVehicle, VehicleType};

/// Where a snapshot's entities came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// Read from located chunks
    Structured,
    /// Synthesized by the fallback estimator; counts are approximate
    Estimated,
}

/// Entity kinds a savegame chunk can feed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Vehicles,
    Stations,
    Industries,
    Companies,
    Map,
}

/// How much of an entity kind's records could be trusted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionStatus {
    /// Every field was read from the save data
    Decoded,
    /// Records exist and are counted, but most fields are placeholders
    CountOnly,
    /// The chunk was seen but its records are not decoded or were unreadable
    NotImplemented,
    /// No chunk of this kind was located
    #[default]
    Absent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ExtractionReport {
    pub vehicles: ExtractionStatus,
    pub stations: ExtractionStatus,
    pub industries: ExtractionStatus,
    pub companies: ExtractionStatus,
    pub map: ExtractionStatus,
}

impl ExtractionReport {
    pub fn get(&self, kind: EntityKind) -> ExtractionStatus {
        match kind {
            EntityKind::Vehicles => self.vehicles,
            EntityKind::Stations => self.stations,
            EntityKind::Industries => self.industries,
            EntityKind::Companies => self.companies,
            EntityKind::Map => self.map,
        }
    }

    fn slot(&mut self, kind: EntityKind) -> &mut ExtractionStatus {
        match kind {
            EntityKind::Vehicles => &mut self.vehicles,
            EntityKind::Stations => &mut self.stations,
            EntityKind::Industries => &mut self.industries,
            EntityKind::Companies => &mut self.companies,
            EntityKind::Map => &mut self.map,
        }
    }
}

/// Everything one parse recovered from a savegame.
///
/// Built once by `SnapshotAssembler` and read-only afterwards. Entities
/// reference each other by id only; a vehicle's company may be missing
/// from `companies`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MapSnapshot {
    map_width: u32,
    map_height: u32,
    vehicles: Vec<ParsedVehicle>,
    stations: Vec<ParsedStation>,
    industries: Vec<ParsedIndustry>,
    companies: Vec<ParsedCompany>,
    provenance: Provenance,
    extraction: ExtractionReport,
    chunk_census: IndexMap<String, usize>,
    unrecognized_chunks: usize,
}

impl MapSnapshot {
    pub fn map_width(&self) -> u32 {
        self.map_width
    }

    pub fn map_height(&self) -> u32 {
        self.map_height
    }

    pub fn vehicles(&self) -> &[ParsedVehicle] {
        &self.vehicles
    }

    pub fn stations(&self) -> &[ParsedStation] {
        &self.stations
    }

    pub fn industries(&self) -> &[ParsedIndustry] {
        &self.industries
    }

    pub fn companies(&self) -> &[ParsedCompany] {
        &self.companies
    }

    pub fn provenance(&self) -> Provenance {
        self.provenance
    }

    pub fn is_estimated(&self) -> bool {
        self.provenance == Provenance::Estimated
    }

    pub fn extraction(&self) -> &ExtractionReport {
        &self.extraction
    }

    /// Accepted chunk tags with their counts, in the order first seen
    pub fn chunk_census(&self) -> &IndexMap<String, usize> {
        &self.chunk_census
    }

    pub fn unrecognized_chunks(&self) -> usize {
        self.unrecognized_chunks
    }

    pub fn total_vehicles(&self) -> usize {
        self.vehicles.len()
    }

    pub fn total_stations(&self) -> usize {
        self.stations.len()
    }

    pub fn total_industries(&self) -> usize {
        self.industries.len()
    }

    pub fn total_companies(&self) -> usize {
        self.companies.len()
    }

    pub fn vehicles_by_type(&self) -> BTreeMap<VehicleType, usize> {
        let mut counts = BTreeMap::new();
        for vehicle in &self.vehicles {
            *counts.entry(vehicle.vehicle_type).or_insert(0) += 1;
        }
        counts
    }

    pub fn vehicles_by_company(&self) -> BTreeMap<CompanyId, usize> {
        let mut counts = BTreeMap::new();
        for vehicle in &self.vehicles {
            *counts.entry(vehicle.company_id).or_insert(0) += 1;
        }
        counts
    }

    pub fn company(&self, id: CompanyId) -> Option<&ParsedCompany> {
        self.companies.iter().find(|c| c.id == id)
    }

    /// JSON view with the keys monitoring dashboards read, plus totals
    pub fn to_json(&self) -> serde_json::Value {
        let mut value = serde_json::to_value(self).unwrap_or(serde_json::Value::Null);
        if let Some(object) = value.as_object_mut() {
            object.insert("total_vehicles".into(), self.total_vehicles().into());
            object.insert("total_stations".into(), self.total_stations().into());
            object.insert("total_industries".into(), self.total_industries().into());
            object.insert("total_companies".into(), self.total_companies().into());
        }
        value
    }
}

/// Accumulates extractor output for one parse
#[derive(Debug, Default)]
pub struct SnapshotAssembler {
    map_width: u32,
    map_height: u32,
    vehicles: Vec<ParsedVehicle>,
    stations: Vec<ParsedStation>,
    industries: Vec<ParsedIndustry>,
    companies: Vec<ParsedCompany>,
    extraction: ExtractionReport,
    chunk_census: IndexMap<String, usize>,
    recognized_chunks: usize,
    unrecognized_chunks: usize,
}

impl SnapshotAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_chunk(&mut self, tag: &str, recognized: bool) {
        *self.chunk_census.entry(tag.to_string()).or_insert(0) += 1;
        if recognized {
            self.recognized_chunks += 1;
        } else {
            self.unrecognized_chunks += 1;
        }
    }

    pub fn recognized_chunks(&self) -> usize {
        self.recognized_chunks
    }

    /// Record the status of an entity kind; a stronger status is never
    /// downgraded by a later, weaker chunk of the same kind.
    pub fn set_status(&mut self, kind: EntityKind, status: ExtractionStatus) {
        let slot = self.extraction.slot(kind);
        if status_rank(status) > status_rank(*slot) {
            *slot = status;
        }
    }

    /// Append vehicles, renumbering them so ids stay unique across chunks
    pub fn push_vehicles(&mut self, vehicles: Vec<ParsedVehicle>) {
        self.vehicles.reserve(vehicles.len());
        for mut vehicle in vehicles {
            vehicle.id = self.vehicles.len() as u32;
            self.vehicles.push(vehicle);
        }
    }

    pub fn push_stations(&mut self, stations: Vec<ParsedStation>) {
        self.stations.extend(stations);
    }

    pub fn push_industries(&mut self, industries: Vec<ParsedIndustry>) {
        self.industries.extend(industries);
    }

    pub fn push_companies(&mut self, companies: Vec<ParsedCompany>) {
        self.companies.extend(companies);
    }

    pub fn set_map_size(&mut self, width: u32, height: u32) {
        self.map_width = width;
        self.map_height = height;
    }

    pub fn finish(self, provenance: Provenance) -> MapSnapshot {
        MapSnapshot {
            map_width: self.map_width,
            map_height: self.map_height,
            vehicles: self.vehicles,
            stations: self.stations,
            industries: self.industries,
            companies: self.companies,
            provenance,
            extraction: self.extraction,
            chunk_census: self.chunk_census,
            unrecognized_chunks: self.unrecognized_chunks,
        }
    }
}

fn status_rank(status: ExtractionStatus) -> u8 {
    match status {
        ExtractionStatus::Absent => 0,
        ExtractionStatus::NotImplemented => 1,
        ExtractionStatus::CountOnly => 2,
        ExtractionStatus::Decoded => 3,
    }
}
