use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::types::Percent;

/// Tolerance used when checking authored tables against 100.
pub const SUM_TOLERANCE: Decimal = dec!(0.1);

/// True when `values` sum to `total` within [`SUM_TOLERANCE`].
pub fn sums_to(values: &[Decimal], total: Decimal) -> bool {
    let sum: Decimal = values.iter().sum();
    (sum - total).abs() <= SUM_TOLERANCE
}

/// Round `values` to `dp` decimal places so that they add up to exactly
/// `total` (largest-remainder / Hamilton method).
///
/// Values are first rescaled proportionally onto `total`, then floored to the
/// rounding unit. The units still missing go one each to the entries with the
/// largest discarded remainder; ties prefer the larger value, then the earlier
/// position. Non-positive inputs are treated as zero. If every input is zero
/// the result is all zeros.
pub fn largest_remainder(values: &[Decimal], total: Percent, dp: u32) -> Vec<Percent> {
    let clean: Vec<Decimal> = values.iter().map(|v| (*v).max(Decimal::ZERO)).collect();
    let sum: Decimal = clean.iter().sum();
    if sum.is_zero() {
        return vec![Decimal::ZERO; values.len()];
    }

    let unit = Decimal::new(1, dp);
    let scaled: Vec<Decimal> = clean.iter().map(|v| *v * total / sum).collect();
    let mut rounded: Vec<Decimal> = scaled
        .iter()
        .map(|v| (*v / unit).floor() * unit)
        .collect();

    let assigned: Decimal = rounded.iter().sum();
    let missing_units = ((total - assigned) / unit)
        .round()
        .to_usize()
        .unwrap_or(0);

    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| {
        let rem_a = scaled[a] - rounded[a];
        let rem_b = scaled[b] - rounded[b];
        rem_b
            .cmp(&rem_a)
            .then(scaled[b].cmp(&scaled[a]))
            .then(a.cmp(&b))
    });

    for &idx in order.iter().take(missing_units) {
        rounded[idx] += unit;
    }
    rounded.iter().map(|v| v.normalize()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn total(v: &[Decimal]) -> Decimal {
        v.iter().sum()
    }

    #[test]
    fn test_exact_values_unchanged() {
        let out = largest_remainder(&[dec!(25), dec!(60), dec!(10), dec!(5)], dec!(100), 1);
        assert_eq!(out, vec![dec!(25), dec!(60), dec!(10), dec!(5)]);
    }

    #[test]
    fn test_thirds_reconcile_to_hundred() {
        let third = dec!(100) / dec!(3);
        let out = largest_remainder(&[third, third, third], dec!(100), 1);
        assert_eq!(total(&out), dec!(100));
        // First position wins the tie
        assert_eq!(out, vec![dec!(33.4), dec!(33.3), dec!(33.3)]);
    }

    #[test]
    fn test_largest_remainder_wins() {
        let out = largest_remainder(&[dec!(10.04), dec!(20.08), dec!(69.88)], dec!(100), 1);
        assert_eq!(total(&out), dec!(100));
        assert_eq!(out, vec![dec!(10.0), dec!(20.1), dec!(69.9)]);
    }

    #[test]
    fn test_rescales_off_total_inputs() {
        let out = largest_remainder(&[dec!(1), dec!(1), dec!(2)], dec!(100), 1);
        assert_eq!(out, vec![dec!(25), dec!(25), dec!(50)]);
    }

    #[test]
    fn test_all_zero_is_degenerate() {
        let out = largest_remainder(&[dec!(0), dec!(0)], dec!(100), 1);
        assert_eq!(out, vec![dec!(0), dec!(0)]);
    }

    #[test]
    fn test_sums_to_tolerance() {
        assert!(sums_to(&[dec!(50), dec!(49.95)], dec!(100)));
        assert!(!sums_to(&[dec!(50), dec!(49)], dec!(100)));
    }
}
