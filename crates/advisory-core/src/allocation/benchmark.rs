use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;
use tracing::debug;

use super::reconcile::{largest_remainder, sums_to};
use crate::config::EngineConfig;
use crate::error::AdvisoryError;
use crate::profiling::bands::RiskBand;
use crate::types::{with_metadata, ComputationOutput, Percent, Score};
use crate::AdvisoryResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Investable universe for the benchmark.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Universe {
    #[default]
    Global,
    /// Domestic instruments only: every foreign sub-bucket is zero.
    #[serde(alias = "solo_chile", alias = "local-only")]
    LocalOnly,
}

impl fmt::Display for Universe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Universe::Global => f.write_str("global"),
            Universe::LocalOnly => f.write_str("local_only"),
        }
    }
}

/// Top-level asset-class weights, percentage points of the whole portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopLevelWeights {
    pub equities: Percent,
    pub fixed_income: Percent,
    pub alternatives: Percent,
    pub cash: Percent,
}

/// Equity regions, percent of the equity bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityRegions {
    pub chile: Percent,
    pub latam_ex_chile: Percent,
    pub usa: Percent,
    pub europe: Percent,
    pub asia_dev: Percent,
    pub emergentes: Percent,
}

/// Fixed-income buckets, percent of the fixed-income bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixedIncomeBuckets {
    pub local_short: Percent,
    pub local_long: Percent,
    pub global_ig: Percent,
    pub global_hy: Percent,
    pub inflation_linked: Percent,
}

/// Alternative buckets, percent of the alternatives bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlternativeBuckets {
    pub real_estate: Percent,
    pub infrastructure: Percent,
    pub others: Percent,
}

impl TopLevelWeights {
    pub fn values(&self) -> [Percent; 4] {
        [self.equities, self.fixed_income, self.alternatives, self.cash]
    }

    fn from_values(v: &[Percent]) -> Self {
        Self {
            equities: v[0],
            fixed_income: v[1],
            alternatives: v[2],
            cash: v[3],
        }
    }
}

impl EquityRegions {
    pub fn values(&self) -> [Percent; 6] {
        [
            self.chile,
            self.latam_ex_chile,
            self.usa,
            self.europe,
            self.asia_dev,
            self.emergentes,
        ]
    }

    /// Everything outside the domestic market.
    pub fn foreign(&self) -> [Percent; 5] {
        [
            self.latam_ex_chile,
            self.usa,
            self.europe,
            self.asia_dev,
            self.emergentes,
        ]
    }

    fn from_values(v: &[Percent]) -> Self {
        Self {
            chile: v[0],
            latam_ex_chile: v[1],
            usa: v[2],
            europe: v[3],
            asia_dev: v[4],
            emergentes: v[5],
        }
    }
}

impl FixedIncomeBuckets {
    pub fn values(&self) -> [Percent; 5] {
        [
            self.local_short,
            self.local_long,
            self.global_ig,
            self.global_hy,
            self.inflation_linked,
        ]
    }

    fn from_values(v: &[Percent]) -> Self {
        Self {
            local_short: v[0],
            local_long: v[1],
            global_ig: v[2],
            global_hy: v[3],
            inflation_linked: v[4],
        }
    }
}

impl AlternativeBuckets {
    pub fn values(&self) -> [Percent; 3] {
        [self.real_estate, self.infrastructure, self.others]
    }

    fn from_values(v: &[Percent]) -> Self {
        Self {
            real_estate: v[0],
            infrastructure: v[1],
            others: v[2],
        }
    }
}

/// Strategic benchmark for one (score, alternatives, universe) triple.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetAllocation {
    pub band: RiskBand,
    pub global_score: Score,
    pub universe: Universe,
    pub include_alternatives: bool,
    pub weights: TopLevelWeights,
    pub equity_regions: EquityRegions,
    pub fixed_income_buckets: FixedIncomeBuckets,
    pub alternative_buckets: AlternativeBuckets,
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BandWeights {
    pub conservative: TopLevelWeights,
    pub moderate: TopLevelWeights,
    pub growth: TopLevelWeights,
    pub aggressive: TopLevelWeights,
}

impl BandWeights {
    pub fn for_band(&self, band: RiskBand) -> &TopLevelWeights {
        match band {
            RiskBand::Conservative => &self.conservative,
            RiskBand::Moderate => &self.moderate,
            RiskBand::Growth => &self.growth,
            RiskBand::Aggressive => &self.aggressive,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UniverseTables {
    pub equity_regions: EquityRegions,
    pub fixed_income_buckets: FixedIncomeBuckets,
}

/// Where the alternatives budget goes when alternatives are excluded.
/// Shares are fractions of that budget and sum to 1.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlternativesRedistribution {
    pub fixed_income_share: Decimal,
    pub cash_share: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationConfig {
    pub band_weights: BandWeights,
    pub global: UniverseTables,
    pub local_only: UniverseTables,
    pub alternative_buckets: AlternativeBuckets,
    pub alternatives_redistribution: AlternativesRedistribution,
}

fn top(equities: Decimal, fixed_income: Decimal, alternatives: Decimal, cash: Decimal) -> TopLevelWeights {
    TopLevelWeights {
        equities,
        fixed_income,
        alternatives,
        cash,
    }
}

impl Default for AllocationConfig {
    fn default() -> Self {
        Self {
            band_weights: BandWeights {
                conservative: top(dec!(25), dec!(60), dec!(10), dec!(5)),
                moderate: top(dec!(45), dec!(45), dec!(10), dec!(0)),
                growth: top(dec!(65), dec!(25), dec!(10), dec!(0)),
                aggressive: top(dec!(85), dec!(10), dec!(5), dec!(0)),
            },
            // ACWI-like with a small LatAm home bias
            global: UniverseTables {
                equity_regions: EquityRegions {
                    chile: dec!(5),
                    latam_ex_chile: dec!(5),
                    usa: dec!(55),
                    europe: dec!(15),
                    asia_dev: dec!(10),
                    emergentes: dec!(10),
                },
                fixed_income_buckets: FixedIncomeBuckets {
                    local_short: dec!(20),
                    local_long: dec!(20),
                    global_ig: dec!(40),
                    global_hy: dec!(10),
                    inflation_linked: dec!(10),
                },
            },
            local_only: UniverseTables {
                equity_regions: EquityRegions {
                    chile: dec!(100),
                    latam_ex_chile: dec!(0),
                    usa: dec!(0),
                    europe: dec!(0),
                    asia_dev: dec!(0),
                    emergentes: dec!(0),
                },
                fixed_income_buckets: FixedIncomeBuckets {
                    local_short: dec!(50),
                    local_long: dec!(50),
                    global_ig: dec!(0),
                    global_hy: dec!(0),
                    inflation_linked: dec!(0),
                },
            },
            alternative_buckets: AlternativeBuckets {
                real_estate: dec!(40),
                infrastructure: dec!(40),
                others: dec!(20),
            },
            alternatives_redistribution: AlternativesRedistribution {
                fixed_income_share: dec!(0.8),
                cash_share: dec!(0.2),
            },
        }
    }
}

fn check_group(table: &str, values: &[Decimal]) -> AdvisoryResult<()> {
    if values.iter().any(|v| *v < Decimal::ZERO) {
        return Err(AdvisoryError::invalid_config(table, "weights must be non-negative"));
    }
    if !sums_to(values, dec!(100)) {
        let sum: Decimal = values.iter().sum();
        return Err(AdvisoryError::invalid_config(
            table,
            format!("weights must sum to 100, got {}", sum),
        ));
    }
    Ok(())
}

impl AllocationConfig {
    pub fn validate(&self) -> AdvisoryResult<()> {
        for band in RiskBand::ALL {
            check_group(
                &format!("band_weights.{}", band.label().to_lowercase()),
                &self.band_weights.for_band(band).values(),
            )?;
        }
        for (name, tables) in [("global", &self.global), ("local_only", &self.local_only)] {
            check_group(
                &format!("{}.equity_regions", name),
                &tables.equity_regions.values(),
            )?;
            check_group(
                &format!("{}.fixed_income_buckets", name),
                &tables.fixed_income_buckets.values(),
            )?;
        }
        check_group("alternative_buckets", &self.alternative_buckets.values())?;

        let local = &self.local_only;
        if local.equity_regions.foreign().iter().any(|v| !v.is_zero()) {
            return Err(AdvisoryError::invalid_config(
                "local_only.equity_regions",
                "foreign regions must be zero",
            ));
        }
        let fi = &local.fixed_income_buckets;
        if !fi.global_ig.is_zero() || !fi.global_hy.is_zero() {
            return Err(AdvisoryError::invalid_config(
                "local_only.fixed_income_buckets",
                "global buckets must be zero",
            ));
        }

        let r = &self.alternatives_redistribution;
        if r.fixed_income_share < Decimal::ZERO
            || r.cash_share < Decimal::ZERO
            || r.fixed_income_share + r.cash_share != Decimal::ONE
        {
            return Err(AdvisoryError::invalid_config(
                "alternatives_redistribution",
                "shares must be non-negative and sum to 1",
            ));
        }
        Ok(())
    }

    fn universe(&self, universe: Universe) -> &UniverseTables {
        match universe {
            Universe::Global => &self.global,
            Universe::LocalOnly => &self.local_only,
        }
    }
}

// ---------------------------------------------------------------------------
// Allocation
// ---------------------------------------------------------------------------

/// Map a global risk score to the strategic benchmark.
///
/// The band comes from the same thresholds as the profile label. Without
/// alternatives, their budget is split into fixed income and cash by the
/// configured shares. Every group is reconciled to exactly 100 at one
/// decimal place.
pub fn allocate(
    config: &EngineConfig,
    global_score: Score,
    include_alternatives: bool,
    universe: Universe,
) -> AdvisoryResult<ComputationOutput<AssetAllocation>> {
    let start = Instant::now();
    let warnings: Vec<String> = Vec::new();

    if global_score < Decimal::ZERO || global_score > dec!(100) {
        return Err(AdvisoryError::invalid_input(
            "global_score",
            format!("must be within [0, 100], got {}", global_score),
        ));
    }

    let alloc_cfg = &config.allocation;
    let band = RiskBand::from_score(&config.risk_bands, global_score);
    let mut base = alloc_cfg.band_weights.for_band(band).clone();

    if !include_alternatives {
        let budget = base.alternatives;
        let split = &alloc_cfg.alternatives_redistribution;
        base.fixed_income += budget * split.fixed_income_share;
        base.cash += budget * split.cash_share;
        base.alternatives = Decimal::ZERO;
    }

    let tables = alloc_cfg.universe(universe);
    let weights = TopLevelWeights::from_values(&largest_remainder(&base.values(), dec!(100), 1));
    let equity_regions =
        EquityRegions::from_values(&largest_remainder(&tables.equity_regions.values(), dec!(100), 1));
    let fixed_income_buckets = FixedIncomeBuckets::from_values(&largest_remainder(
        &tables.fixed_income_buckets.values(),
        dec!(100),
        1,
    ));
    let alternative_buckets = AlternativeBuckets::from_values(&largest_remainder(
        &alloc_cfg.alternative_buckets.values(),
        dec!(100),
        1,
    ));

    debug!(%global_score, %band, %universe, include_alternatives, "benchmark allocated");

    let output = AssetAllocation {
        band,
        global_score,
        universe,
        include_alternatives,
        weights,
        equity_regions,
        fixed_income_buckets,
        alternative_buckets,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Strategic benchmark: banded asset-class weights with regional and bucket splits",
        &serde_json::json!({
            "config_version": config.version,
            "risk_bands": config.risk_bands,
            "alternatives_redistribution": alloc_cfg.alternatives_redistribution,
            "rounding": "largest remainder, 1 dp",
        }),
        warnings,
        elapsed,
        output,
    ))
}

/// [`allocate`] against the standard configuration.
pub fn allocate_standard(
    global_score: Score,
    include_alternatives: bool,
    universe: Universe,
) -> AdvisoryResult<ComputationOutput<AssetAllocation>> {
    allocate(EngineConfig::standard(), global_score, include_alternatives, universe)
}
