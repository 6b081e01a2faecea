use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::AdvisoryError;
use crate::types::Score;
use crate::AdvisoryResult;

/// Risk tier selected by thresholding the global score. Ordered from the
/// most defensive to the most aggressive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskBand {
    Conservative,
    Moderate,
    Growth,
    Aggressive,
}

impl RiskBand {
    pub const ALL: [RiskBand; 4] = [
        RiskBand::Conservative,
        RiskBand::Moderate,
        RiskBand::Growth,
        RiskBand::Aggressive,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            RiskBand::Conservative => "Conservative",
            RiskBand::Moderate => "Moderate",
            RiskBand::Growth => "Growth",
            RiskBand::Aggressive => "Aggressive",
        }
    }

    /// Band for a global score. Scores are expected in [0, 100]; anything
    /// below the first cut is Conservative, anything at or above the last is
    /// Aggressive.
    pub fn from_score(table: &RiskBandTable, score: Score) -> RiskBand {
        if score < table.moderate_from {
            RiskBand::Conservative
        } else if score < table.growth_from {
            RiskBand::Moderate
        } else if score < table.aggressive_from {
            RiskBand::Growth
        } else {
            RiskBand::Aggressive
        }
    }
}

impl fmt::Display for RiskBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Lower bounds (inclusive) of each band above Conservative. The scorer's
/// profile label and the allocator's band both read this table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskBandTable {
    pub moderate_from: Score,
    pub growth_from: Score,
    pub aggressive_from: Score,
}

impl Default for RiskBandTable {
    fn default() -> Self {
        Self {
            moderate_from: dec!(30),
            growth_from: dec!(55),
            aggressive_from: dec!(80),
        }
    }
}

impl RiskBandTable {
    pub fn validate(&self) -> AdvisoryResult<()> {
        let cuts = [self.moderate_from, self.growth_from, self.aggressive_from];
        if cuts[0] <= Decimal::ZERO || cuts[2] >= dec!(100) {
            return Err(AdvisoryError::invalid_config(
                "risk_bands",
                "thresholds must lie strictly inside (0, 100)",
            ));
        }
        if cuts.windows(2).any(|w| w[0] >= w[1]) {
            return Err(AdvisoryError::invalid_config(
                "risk_bands",
                "thresholds must be strictly ascending",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_edges() {
        let table = RiskBandTable::default();
        assert_eq!(RiskBand::from_score(&table, dec!(0)), RiskBand::Conservative);
        assert_eq!(RiskBand::from_score(&table, dec!(29.9)), RiskBand::Conservative);
        assert_eq!(RiskBand::from_score(&table, dec!(30)), RiskBand::Moderate);
        assert_eq!(RiskBand::from_score(&table, dec!(54.9)), RiskBand::Moderate);
        assert_eq!(RiskBand::from_score(&table, dec!(55)), RiskBand::Growth);
        assert_eq!(RiskBand::from_score(&table, dec!(80)), RiskBand::Aggressive);
        assert_eq!(RiskBand::from_score(&table, dec!(100)), RiskBand::Aggressive);
    }

    #[test]
    fn test_bands_are_ordered() {
        assert!(RiskBand::Conservative < RiskBand::Moderate);
        assert!(RiskBand::Growth < RiskBand::Aggressive);
    }

    #[test]
    fn test_unordered_thresholds_rejected() {
        let table = RiskBandTable {
            moderate_from: dec!(50),
            growth_from: dec!(40),
            aggressive_from: dec!(80),
        };
        assert!(table.validate().is_err());
    }

    #[test]
    fn test_threshold_at_hundred_rejected() {
        let table = RiskBandTable {
            moderate_from: dec!(30),
            growth_from: dec!(55),
            aggressive_from: dec!(100),
        };
        assert!(table.validate().is_err());
    }
}
