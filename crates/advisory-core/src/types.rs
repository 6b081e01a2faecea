use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.05 = 5%). Never as percentages.
pub type Rate = Decimal;

/// Portfolio weights in percentage points (25 = 25% of the relevant total).
pub type Percent = Decimal;

/// Questionnaire and risk scores on a 0–100 scale.
pub type Score = Decimal;

/// Ages and year counts
pub type Years = Decimal;

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

/// Round half away from zero to one decimal place (the display precision for
/// scores and weights).
pub fn round1(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(1, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round1_midpoint_away_from_zero() {
        assert_eq!(round1(dec!(12.25)), dec!(12.3));
        assert_eq!(round1(dec!(12.24)), dec!(12.2));
        assert_eq!(round1(dec!(-0.05)), dec!(-0.1));
    }

    #[test]
    fn test_with_metadata_carries_warnings() {
        let out = with_metadata("m", &serde_json::json!({"k": 1}), vec!["w".into()], 3, 42u32);
        assert_eq!(out.result, 42);
        assert_eq!(out.warnings, vec!["w".to_string()]);
        assert_eq!(out.assumptions["k"], 1);
        assert_eq!(out.metadata.precision, "rust_decimal_128bit");
    }
}
