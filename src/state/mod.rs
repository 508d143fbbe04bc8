pub mod company;
pub mod industry;
pub mod snapshot;
pub mod station;
pub mod vehicle;

pub use company::{
    ParsedCompany, CompanyId,
    MAX_COMPANIES, is_valid_company,
};
pub use industry::{ParsedIndustry, CargoType};
pub use snapshot::{
    MapSnapshot, SnapshotAssembler, Provenance,
    EntityKind, ExtractionStatus, ExtractionReport,
};
pub use station::{ParsedStation, StationFacilities};
pub use vehicle::{ParsedVehicle, VehicleId, VehicleType, Position};
