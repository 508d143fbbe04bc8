use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Tunable bounds for one savegame parse.
///
/// The defaults reproduce the limits the monitoring client has always used;
/// a JSON file can override any subset of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Cumulative single-byte resync steps before the chunk walk gives up.
    pub walk_limit: usize,
    /// Chunk bodies longer than this are treated as false tag matches.
    pub max_chunk_len: usize,
    /// Size of one vehicle record in a `VEHS` body.
    pub vehicle_stride: usize,
    /// Fallback: this many company-id-like words count as one vehicle.
    pub estimate_divisor: usize,
    /// Fallback: upper bound on synthesized vehicles.
    pub estimate_cap: usize,
    /// Fallback: vehicle types cycled through when synthesizing.
    pub estimate_type_cycle: u8,
    /// Fallback: company ids cycled through when synthesizing.
    pub estimate_company_cycle: u8,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            walk_limit: 50_000,
            max_chunk_len: 1_000_000,
            vehicle_stride: 32,
            estimate_divisor: 10,
            estimate_cap: 200,
            estimate_type_cycle: 4,
            estimate_company_cycle: 8,
        }
    }
}

impl ParserConfig {
    /// Load overrides from a JSON file. Missing keys keep their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)
            .map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.vehicle_stride < 2 {
            return Err(Error::Config(format!(
                "vehicle_stride must be at least 2, got {}",
                self.vehicle_stride
            )));
        }
        if self.estimate_divisor == 0 {
            return Err(Error::Config("estimate_divisor must be non-zero".into()));
        }
        if self.estimate_type_cycle == 0 || self.estimate_type_cycle > 6 {
            return Err(Error::Config(format!(
                "estimate_type_cycle must be in 1..=6, got {}",
                self.estimate_type_cycle
            )));
        }
        if self.estimate_company_cycle == 0 || self.estimate_company_cycle > 16 {
            return Err(Error::Config(format!(
                "estimate_company_cycle must be in 1..=16, got {}",
                self.estimate_company_cycle
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ParserConfig::default();
        assert_eq!(config.walk_limit, 50_000);
        assert_eq!(config.max_chunk_len, 1_000_000);
        assert_eq!(config.vehicle_stride, 32);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = ParserConfig::from_json_str(r#"{ "walk_limit": 1000 }"#).unwrap();
        assert_eq!(config.walk_limit, 1000);
        assert_eq!(config.estimate_cap, 200);
    }

    #[test]
    fn test_rejects_zero_divisor() {
        let err = ParserConfig::from_json_str(r#"{ "estimate_divisor": 0 }"#).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = ParserConfig::from_json_file("/nonexistent/parser.json").unwrap_err();
        assert_eq!(err.kind_label(), "config");
    }
}
