//! Engine configuration: every static table the computations read.
//!
//! Tables are plain serde data so deployments can override them from a file.
//! [`EngineConfig::standard`] is the frozen, validated default that the
//! `*_standard` helpers use.

use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use tracing::debug;

use crate::AdvisoryResult;

#[cfg(feature = "allocation")]
use crate::allocation::{benchmark::AllocationConfig, tilt::TiltThresholds};
#[cfg(feature = "analytics")]
use crate::analytics::metrics::AnalyticsConfig;
#[cfg(feature = "classification")]
use crate::classification::fund::ClassifierConfig;
#[cfg(feature = "profiling")]
use crate::profiling::{bands::RiskBandTable, scoring::ProfilingConfig};
#[cfg(feature = "retirement")]
use crate::retirement::life_expectancy::ActuarialConfig;

pub const CONFIG_VERSION: &str = "v1";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Reported in every computation's assumptions.
    pub version: String,
    #[cfg(feature = "classification")]
    pub classifier: ClassifierConfig,
    #[cfg(feature = "profiling")]
    pub profiling: ProfilingConfig,
    #[cfg(feature = "profiling")]
    pub risk_bands: RiskBandTable,
    #[cfg(feature = "allocation")]
    pub allocation: AllocationConfig,
    #[cfg(feature = "allocation")]
    pub tilt: TiltThresholds,
    #[cfg(feature = "retirement")]
    pub actuarial: ActuarialConfig,
    #[cfg(feature = "analytics")]
    pub analytics: AnalyticsConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION.to_string(),
            #[cfg(feature = "classification")]
            classifier: ClassifierConfig::default(),
            #[cfg(feature = "profiling")]
            profiling: ProfilingConfig::default(),
            #[cfg(feature = "profiling")]
            risk_bands: RiskBandTable::default(),
            #[cfg(feature = "allocation")]
            allocation: AllocationConfig::default(),
            #[cfg(feature = "allocation")]
            tilt: TiltThresholds::default(),
            #[cfg(feature = "retirement")]
            actuarial: ActuarialConfig::default(),
            #[cfg(feature = "analytics")]
            analytics: AnalyticsConfig::default(),
        }
    }
}

static STANDARD: OnceLock<EngineConfig> = OnceLock::new();

impl EngineConfig {
    /// Process-wide default configuration, built once.
    pub fn standard() -> &'static EngineConfig {
        STANDARD.get_or_init(EngineConfig::default)
    }

    /// Run every table's consistency checks.
    pub fn validate(&self) -> AdvisoryResult<()> {
        #[cfg(feature = "classification")]
        self.classifier.validate()?;
        #[cfg(feature = "profiling")]
        {
            self.profiling.validate()?;
            self.risk_bands.validate()?;
        }
        #[cfg(feature = "allocation")]
        {
            self.allocation.validate()?;
            self.tilt.validate()?;
        }
        #[cfg(feature = "retirement")]
        self.actuarial.validate()?;
        #[cfg(feature = "analytics")]
        self.analytics.validate()?;
        debug!(version = %self.version, "engine config validated");
        Ok(())
    }

    /// Parse a JSON document and validate it. Missing sections fall back to
    /// their defaults.
    pub fn from_json(json: &str) -> AdvisoryResult<Self> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_validates() {
        assert!(EngineConfig::default().validate().is_ok());
        assert_eq!(EngineConfig::standard().version, "v1");
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let cfg = EngineConfig::from_json(r#"{"version":"custom"}"#).unwrap();
        assert_eq!(cfg.version, "custom");
        #[cfg(feature = "analytics")]
        assert_eq!(cfg.analytics.trading_days, 252);
    }

    #[test]
    fn test_round_trip_of_defaults() {
        let json = serde_json::to_string(&EngineConfig::default()).unwrap();
        assert!(EngineConfig::from_json(&json).is_ok());
    }

    #[cfg(feature = "allocation")]
    #[test]
    fn test_invalid_section_rejected() {
        let json = r#"{"tilt":{"neutral_below":"3","moderate_from":"2","strong_from":"5"}}"#;
        assert!(matches!(
            EngineConfig::from_json(json),
            Err(crate::AdvisoryError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_malformed_json_is_serialization_error() {
        assert!(matches!(
            EngineConfig::from_json("{not json"),
            Err(crate::AdvisoryError::SerializationError(_))
        ));
    }
}
