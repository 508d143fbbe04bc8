use super::chunk::ChunkWalk;
use super::envelope;
use super::estimate::estimate_vehicles;
use super::extract::{extractor_for, ExtractorOutcome};
use crate::config::ParserConfig;
use crate::error::Result;
use crate::state::{
    EntityKind, ExtractionStatus, MapSnapshot, Provenance, SnapshotAssembler,
};

/// Savegame parser.
///
/// Holds configuration only; every call starts from an empty accumulator,
/// so one parser can serve any number of threads.
#[derive(Debug, Clone, Default)]
pub struct MapParser {
    config: ParserConfig,
}

impl MapParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    pub fn walk_limit(mut self, limit: usize) -> Self {
        self.config.walk_limit = limit;
        self
    }

    pub fn max_chunk_len(mut self, len: usize) -> Self {
        self.config.max_chunk_len = len;
        self
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Decompress a savegame blob and build a snapshot from it.
    ///
    /// Envelope and codec failures are returned as errors; anything the
    /// chunk walk cannot make sense of degrades the snapshot instead.
    pub fn parse(&self, blob: &[u8]) -> Result<MapSnapshot> {
        let stream = envelope::resolve(blob).map_err(|e| {
            tracing::error!(kind = e.kind_label(), error = %e, "failed to open savegame");
            e
        })?;
        Ok(self.parse_stream(&stream))
    }

    /// Build a snapshot from an already decompressed stream
    pub fn parse_stream(&self, stream: &[u8]) -> MapSnapshot {
        tracing::info!(len = stream.len(), "parsing savegame stream");

        let mut assembler = SnapshotAssembler::new();
        let mut walk = ChunkWalk::new(stream, &self.config);

        for record in walk.by_ref() {
            let tag = record.tag_str();
            let Some(extractor) = extractor_for(&record.tag) else {
                tracing::debug!(tag, len = record.body_length, "unhandled chunk");
                assembler.record_chunk(tag, false);
                continue;
            };
            assembler.record_chunk(tag, true);

            let outcome = (extractor.extract)(record.body(stream), &self.config);
            assembler.set_status(extractor.kind, outcome.status());
            match outcome {
                ExtractorOutcome::Vehicles(vehicles) => assembler.push_vehicles(vehicles),
                ExtractorOutcome::Stations(stations) => assembler.push_stations(stations),
                ExtractorOutcome::Industries(industries) => assembler.push_industries(industries),
                ExtractorOutcome::Companies(companies) => assembler.push_companies(companies),
                ExtractorOutcome::MapSize { width, height } => {
                    assembler.set_map_size(width, height)
                }
                ExtractorOutcome::NotImplemented | ExtractorOutcome::Empty => {}
            }
        }

        tracing::info!(
            recognized = assembler.recognized_chunks(),
            stepped = walk.bytes_stepped(),
            aborted = walk.aborted(),
            "chunk walk finished"
        );

        let provenance = if assembler.recognized_chunks() == 0 {
            tracing::warn!("no recognized chunks, estimating vehicles from raw stream");
            assembler.push_vehicles(estimate_vehicles(stream, &self.config));
            assembler.set_status(EntityKind::Vehicles, ExtractionStatus::CountOnly);
            Provenance::Estimated
        } else {
            Provenance::Structured
        };

        let snapshot = assembler.finish(provenance);
        tracing::info!(
            provenance = ?snapshot.provenance(),
            width = snapshot.map_width(),
            height = snapshot.map_height(),
            vehicles = snapshot.total_vehicles(),
            stations = snapshot.total_stations(),
            industries = snapshot.total_industries(),
            companies = snapshot.total_companies(),
            "savegame parsed"
        );
        snapshot
    }
}

/// Parse a savegame blob with the default configuration
pub fn parse_map_data(blob: &[u8]) -> Result<MapSnapshot> {
    MapParser::new().parse(blob)
}
