use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Instant;
use tracing::{debug, warn};

use super::blocks::{BlockId, BlockWeight};
use crate::error::AdvisoryError;
use crate::types::{with_metadata, ComputationOutput, Percent};
use crate::AdvisoryResult;

/// Absolute-difference cut points, in percentage points.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TiltThresholds {
    /// Below this the position is neutral.
    pub neutral_below: Percent,
    pub moderate_from: Percent,
    pub strong_from: Percent,
}

impl Default for TiltThresholds {
    fn default() -> Self {
        Self {
            neutral_below: dec!(0.2),
            moderate_from: dec!(2),
            strong_from: dec!(5),
        }
    }
}

impl TiltThresholds {
    pub fn validate(&self) -> AdvisoryResult<()> {
        if self.neutral_below <= Decimal::ZERO
            || self.moderate_from <= self.neutral_below
            || self.strong_from <= self.moderate_from
        {
            return Err(AdvisoryError::invalid_config(
                "tilt",
                "thresholds must be positive and strictly ascending",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TiltIntensity {
    Neutral,
    Tilt,
    Moderate,
    Strong,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TiltDirection {
    Over,
    Under,
    Flat,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TiltInfo {
    pub neutral: Percent,
    pub model: Percent,
    /// model − neutral, in percentage points
    pub diff: Percent,
    pub intensity: TiltIntensity,
    pub direction: TiltDirection,
    pub label: String,
}

fn tilt_label(intensity: TiltIntensity, direction: TiltDirection) -> String {
    let side = match direction {
        TiltDirection::Over => "Overweight",
        TiltDirection::Under => "Underweight",
        TiltDirection::Flat => return "Neutral".to_string(),
    };
    match intensity {
        TiltIntensity::Neutral => "Neutral".to_string(),
        TiltIntensity::Tilt => side.to_string(),
        TiltIntensity::Moderate => format!("Moderate {}", side),
        TiltIntensity::Strong => format!("Strong {}", side),
    }
}

/// Classify how far a model weight sits from its neutral benchmark weight.
pub fn classify_tilt(thresholds: &TiltThresholds, neutral: Percent, model: Percent) -> TiltInfo {
    let diff = model - neutral;
    let abs = diff.abs();

    let intensity = if abs < thresholds.neutral_below {
        TiltIntensity::Neutral
    } else if abs < thresholds.moderate_from {
        TiltIntensity::Tilt
    } else if abs < thresholds.strong_from {
        TiltIntensity::Moderate
    } else {
        TiltIntensity::Strong
    };
    let direction = if intensity == TiltIntensity::Neutral || diff.is_zero() {
        TiltDirection::Flat
    } else if diff > Decimal::ZERO {
        TiltDirection::Over
    } else {
        TiltDirection::Under
    };

    TiltInfo {
        neutral,
        model,
        diff,
        intensity,
        direction,
        label: tilt_label(intensity, direction),
    }
}

/// Tilt of one benchmark block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockTilt {
    pub block: BlockId,
    pub block_label: String,
    #[serde(flatten)]
    pub tilt: TiltInfo,
}

/// Compare a model portfolio block by block against the benchmark.
///
/// Blocks the model does not mention count as a 0 weight. Model weights on
/// blocks absent from the benchmark are reported in the warnings.
pub fn compare_model(
    thresholds: &TiltThresholds,
    blocks: &[BlockWeight],
    model_weights: &BTreeMap<BlockId, Percent>,
) -> AdvisoryResult<ComputationOutput<Vec<BlockTilt>>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if let Some((block, w)) = model_weights.iter().find(|(_, w)| **w < Decimal::ZERO) {
        return Err(AdvisoryError::invalid_input(
            "model_weights",
            format!("weight for {} is negative ({})", block, w),
        ));
    }

    for (block, weight) in model_weights {
        if !blocks.iter().any(|b| b.block == *block) {
            warn!(%block, "model block not in benchmark");
            warnings.push(format!(
                "Model holds {} pp in '{}', which is not part of the benchmark",
                weight,
                block.label()
            ));
        }
    }

    let tilts: Vec<BlockTilt> = blocks
        .iter()
        .map(|b| {
            let model = model_weights.get(&b.block).copied().unwrap_or(Decimal::ZERO);
            BlockTilt {
                block: b.block,
                block_label: b.label.clone(),
                tilt: classify_tilt(thresholds, b.weight, model),
            }
        })
        .collect();

    let off_neutral = tilts
        .iter()
        .filter(|t| t.tilt.intensity != TiltIntensity::Neutral)
        .count();
    debug!(blocks = tilts.len(), off_neutral, "model compared");

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Tilt analysis: model minus benchmark weight per block",
        &serde_json::json!({
            "thresholds": thresholds,
            "missing_block_weight": "0",
        }),
        warnings,
        elapsed,
        tilts,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocation::blocks::BlockGroup;

    fn t(neutral: Decimal, model: Decimal) -> TiltInfo {
        classify_tilt(&TiltThresholds::default(), neutral, model)
    }

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(t(dec!(10), dec!(10.19)).intensity, TiltIntensity::Neutral);
        assert_eq!(t(dec!(10), dec!(10.2)).intensity, TiltIntensity::Tilt);
        assert_eq!(t(dec!(10), dec!(11.99)).intensity, TiltIntensity::Tilt);
        assert_eq!(t(dec!(10), dec!(12)).intensity, TiltIntensity::Moderate);
        assert_eq!(t(dec!(10), dec!(14.99)).intensity, TiltIntensity::Moderate);
        assert_eq!(t(dec!(10), dec!(15)).intensity, TiltIntensity::Strong);
    }

    #[test]
    fn test_direction_and_label() {
        let over = t(dec!(20), dec!(26));
        assert_eq!(over.direction, TiltDirection::Over);
        assert_eq!(over.label, "Strong Overweight");
        assert_eq!(over.diff, dec!(6));

        let under = t(dec!(20), dec!(17));
        assert_eq!(under.direction, TiltDirection::Under);
        assert_eq!(under.label, "Moderate Underweight");

        let flat = t(dec!(20), dec!(20.1));
        assert_eq!(flat.direction, TiltDirection::Flat);
        assert_eq!(flat.label, "Neutral");

        assert_eq!(t(dec!(20), dec!(19)).label, "Underweight");
    }

    #[test]
    fn test_symmetric_intensity() {
        for d in [dec!(0.1), dec!(0.5), dec!(3), dec!(7)] {
            assert_eq!(
                t(dec!(30), dec!(30) + d).intensity,
                t(dec!(30), dec!(30) - d).intensity
            );
        }
    }

    fn block(id: BlockId, weight: Decimal) -> BlockWeight {
        BlockWeight {
            block: id,
            group: id.group(),
            label: id.label().to_string(),
            index_name: id.index_name().to_string(),
            weight,
        }
    }

    #[test]
    fn test_compare_missing_and_unknown_blocks() {
        let blocks = vec![block(BlockId::EquityUsa, dec!(30)), block(BlockId::FiGlobalIg, dec!(20))];
        let mut model = BTreeMap::new();
        model.insert(BlockId::EquityUsa, dec!(33));
        model.insert(BlockId::AltOthers, dec!(5));

        let out = compare_model(&TiltThresholds::default(), &blocks, &model).unwrap();
        assert_eq!(out.result.len(), 2);
        assert_eq!(out.result[0].tilt.intensity, TiltIntensity::Moderate);
        // missing from the model → 0 → 20 pp under
        assert_eq!(out.result[1].tilt.model, Decimal::ZERO);
        assert_eq!(out.result[1].tilt.intensity, TiltIntensity::Strong);
        assert_eq!(out.result[1].tilt.direction, TiltDirection::Under);
        assert_eq!(out.warnings.len(), 1);
        assert_eq!(out.result[0].block_label, "US Equities");
        assert_eq!(blocks[0].group, BlockGroup::Equities);
    }

    #[test]
    fn test_negative_model_weight_rejected() {
        let blocks = vec![block(BlockId::EquityUsa, dec!(30))];
        let mut model = BTreeMap::new();
        model.insert(BlockId::EquityUsa, dec!(-1));
        assert!(compare_model(&TiltThresholds::default(), &blocks, &model).is_err());
    }

    #[test]
    fn test_thresholds_must_ascend() {
        let bad = TiltThresholds {
            neutral_below: dec!(2),
            moderate_from: dec!(2),
            strong_from: dec!(5),
        };
        assert!(bad.validate().is_err());
        assert!(TiltThresholds::default().validate().is_ok());
    }
}
