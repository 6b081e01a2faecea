use std::collections::BTreeMap;

use advisory_core::allocation::benchmark::{allocate, Universe};
use advisory_core::allocation::blocks::{benchmark_blocks, BlockGroup, BlockId};
use advisory_core::allocation::reconcile::largest_remainder;
use advisory_core::allocation::tilt::{
    classify_tilt, compare_model, TiltDirection, TiltIntensity, TiltThresholds,
};
use advisory_core::profiling::bands::RiskBand;
use advisory_core::{AdvisoryError, EngineConfig};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn universe_strategy() -> impl Strategy<Value = Universe> {
    prop_oneof![Just(Universe::Global), Just(Universe::LocalOnly)]
}

fn sum(values: &[Decimal]) -> Decimal {
    values.iter().sum()
}

// ===========================================================================
// Benchmark allocation
// ===========================================================================

#[test]
fn test_band_edges() {
    let cfg = EngineConfig::default();
    let band = |s: Decimal| allocate(&cfg, s, true, Universe::Global).unwrap().result.band;
    assert_eq!(band(dec!(29.9)), RiskBand::Conservative);
    assert_eq!(band(dec!(30)), RiskBand::Moderate);
    assert_eq!(band(dec!(54.9)), RiskBand::Moderate);
    assert_eq!(band(dec!(55)), RiskBand::Growth);
    assert_eq!(band(dec!(79.9)), RiskBand::Growth);
    assert_eq!(band(dec!(80)), RiskBand::Aggressive);
}

#[test]
fn test_score_and_profile_share_bands() {
    // The allocator band for a score equals the scorer's label for that score
    let cfg = EngineConfig::default();
    for s in [dec!(0), dec!(30), dec!(55), dec!(80), dec!(100)] {
        let a = allocate(&cfg, s, true, Universe::Global).unwrap().result;
        assert_eq!(a.band, RiskBand::from_score(&cfg.risk_bands, s));
    }
}

#[test]
fn test_growth_local_only_without_alternatives() {
    let a = allocate(&EngineConfig::default(), dec!(70), false, Universe::LocalOnly)
        .unwrap()
        .result;
    assert_eq!(a.weights.equities, dec!(65));
    assert_eq!(a.weights.fixed_income, dec!(33));
    assert_eq!(a.weights.cash, dec!(2));
    assert_eq!(a.fixed_income_buckets.local_short, dec!(50));

    let blocks = benchmark_blocks(&a);
    assert!(blocks.iter().all(|b| b.group != BlockGroup::Alternatives));
    let eq_chile = blocks.iter().find(|b| b.block == BlockId::EquityChile).unwrap();
    assert_eq!(eq_chile.weight, dec!(65));
}

#[test]
fn test_region_table_off_by_one_fails_validation() {
    let mut cfg = EngineConfig::default();
    cfg.allocation.global.equity_regions.usa = dec!(54);
    assert!(matches!(
        cfg.validate(),
        Err(AdvisoryError::InvalidConfiguration { .. })
    ));
}

// ===========================================================================
// Tilt
// ===========================================================================

#[test]
fn test_model_equal_to_benchmark_is_all_neutral() {
    let cfg = EngineConfig::default();
    let a = allocate(&cfg, dec!(60), true, Universe::Global).unwrap().result;
    let blocks = benchmark_blocks(&a);
    let model: BTreeMap<BlockId, Decimal> = blocks.iter().map(|b| (b.block, b.weight)).collect();
    let out = compare_model(&cfg.tilt, &blocks, &model).unwrap();
    assert!(out.result.iter().all(|t| t.tilt.intensity == TiltIntensity::Neutral));
    assert!(out.warnings.is_empty());
}

#[test]
fn test_model_holding_excluded_alternatives_warns() {
    let cfg = EngineConfig::default();
    let a = allocate(&cfg, dec!(60), false, Universe::Global).unwrap().result;
    let blocks = benchmark_blocks(&a);
    let mut model: BTreeMap<BlockId, Decimal> = blocks.iter().map(|b| (b.block, b.weight)).collect();
    model.insert(BlockId::AltRealEstate, dec!(3));
    let out = compare_model(&cfg.tilt, &blocks, &model).unwrap();
    assert_eq!(out.warnings.len(), 1);
}

// ===========================================================================
// Properties
// ===========================================================================

proptest! {
    #[test]
    fn prop_every_group_sums_to_hundred(
        tenths in 0i64..=1000,
        alts in any::<bool>(),
        universe in universe_strategy(),
    ) {
        let a = allocate(&EngineConfig::default(), Decimal::new(tenths, 1), alts, universe)
            .unwrap()
            .result;
        prop_assert_eq!(sum(&a.weights.values()), dec!(100));
        prop_assert_eq!(sum(&a.equity_regions.values()), dec!(100));
        prop_assert_eq!(sum(&a.fixed_income_buckets.values()), dec!(100));
        prop_assert_eq!(sum(&a.alternative_buckets.values()), dec!(100));
        prop_assert!(a.weights.values().iter().all(|w| *w >= Decimal::ZERO));
        if !alts {
            prop_assert!(a.weights.alternatives.is_zero());
        }
        if universe == Universe::LocalOnly {
            prop_assert!(a.equity_regions.foreign().iter().all(|w| w.is_zero()));
        }
    }

    #[test]
    fn prop_equity_weight_non_decreasing_in_score(a in 0i64..=1000, b in 0i64..=1000) {
        let cfg = EngineConfig::default();
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let eq = |t: i64| {
            allocate(&cfg, Decimal::new(t, 1), true, Universe::Global)
                .unwrap()
                .result
                .weights
                .equities
        };
        prop_assert!(eq(lo) <= eq(hi));
    }

    #[test]
    fn prop_reconciliation_sums_exactly(raw in proptest::collection::vec(1u32..100_000, 1..8)) {
        let values: Vec<Decimal> = raw.iter().map(|v| Decimal::new(*v as i64, 3)).collect();
        let out = largest_remainder(&values, dec!(100), 1);
        prop_assert_eq!(sum(&out), dec!(100));
        prop_assert!(out.iter().all(|v| *v >= Decimal::ZERO));
    }

    #[test]
    fn prop_tilt_is_symmetric_and_total(
        neutral in 0i64..=10_000,
        diff in 0i64..=2_000,
    ) {
        let t = TiltThresholds::default();
        let n = Decimal::new(neutral, 2);
        let d = Decimal::new(diff, 2);
        let up = classify_tilt(&t, n, n + d);
        let down = classify_tilt(&t, n, n - d);
        prop_assert_eq!(up.intensity, down.intensity);
        prop_assert_eq!(up.intensity == TiltIntensity::Neutral, d < dec!(0.2));
        prop_assert_eq!(up.intensity == TiltIntensity::Strong, d >= dec!(5));
        if d >= dec!(0.2) {
            prop_assert_eq!(up.direction, TiltDirection::Over);
            prop_assert_eq!(down.direction, TiltDirection::Under);
        } else {
            prop_assert_eq!(up.direction, TiltDirection::Flat);
            prop_assert_eq!(down.direction, TiltDirection::Flat);
        }
    }
}
