use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::AdvisoryError;
use crate::types::{round1, Years};
use crate::AdvisoryResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    #[serde(alias = "masculino")]
    Male,
    #[serde(alias = "femenino")]
    Female,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthTier {
    #[serde(alias = "excelente")]
    Excellent,
    #[serde(alias = "buena")]
    Good,
    #[serde(alias = "regular")]
    Fair,
    #[serde(alias = "mala")]
    Poor,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LifeExpectancyInput {
    pub sex: Sex,
    pub current_age: u32,
    pub smoker: bool,
    pub health: HealthTier,
}

/// One knot of the actuarial table: a person aged `age` is expected to live
/// to `expected_age`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ActuarialKnot {
    pub age: u32,
    pub expected_age: Years,
}

/// Simplified TM-2020-style table plus additive lifestyle adjustments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActuarialConfig {
    pub male: Vec<ActuarialKnot>,
    pub female: Vec<ActuarialKnot>,
    pub smoker_adjustment: Years,
    pub health_excellent: Years,
    pub health_good: Years,
    pub health_fair: Years,
    pub health_poor: Years,
}

fn knots(rows: &[(u32, Decimal)]) -> Vec<ActuarialKnot> {
    rows.iter()
        .map(|(age, expected_age)| ActuarialKnot {
            age: *age,
            expected_age: *expected_age,
        })
        .collect()
}

impl Default for ActuarialConfig {
    fn default() -> Self {
        Self {
            male: knots(&[
                (20, dec!(83.9)),
                (30, dec!(84.2)),
                (40, dec!(84.6)),
                (50, dec!(85.2)),
                (60, dec!(86.0)),
                (65, dec!(86.6)),
                (70, dec!(87.4)),
                (75, dec!(88.6)),
                (80, dec!(90.2)),
                (85, dec!(92.3)),
                (90, dec!(94.8)),
                (95, dec!(97.9)),
                (100, dec!(101.6)),
            ]),
            female: knots(&[
                (20, dec!(89.1)),
                (30, dec!(89.3)),
                (40, dec!(89.6)),
                (50, dec!(90.1)),
                (60, dec!(90.8)),
                (65, dec!(91.3)),
                (70, dec!(92.0)),
                (75, dec!(93.0)),
                (80, dec!(94.3)),
                (85, dec!(96.0)),
                (90, dec!(98.0)),
                (95, dec!(100.5)),
                (100, dec!(103.3)),
            ]),
            smoker_adjustment: dec!(-3),
            health_excellent: dec!(2),
            health_good: dec!(0),
            health_fair: dec!(-1),
            health_poor: dec!(-2),
        }
    }
}

impl ActuarialConfig {
    pub fn validate(&self) -> AdvisoryResult<()> {
        for (name, table) in [("male", &self.male), ("female", &self.female)] {
            if table.is_empty() {
                return Err(AdvisoryError::invalid_config(
                    "actuarial",
                    format!("{} table is empty", name),
                ));
            }
            if table.windows(2).any(|w| w[0].age >= w[1].age) {
                return Err(AdvisoryError::invalid_config(
                    "actuarial",
                    format!("{} table ages must be strictly ascending", name),
                ));
            }
            if table
                .iter()
                .any(|k| k.expected_age < Decimal::from(k.age))
            {
                return Err(AdvisoryError::invalid_config(
                    "actuarial",
                    format!("{} table has an expected age below the attained age", name),
                ));
            }
        }
        Ok(())
    }

    fn table(&self, sex: Sex) -> &[ActuarialKnot] {
        match sex {
            Sex::Male => &self.male,
            Sex::Female => &self.female,
        }
    }

    fn health_adjustment(&self, health: HealthTier) -> Years {
        match health {
            HealthTier::Excellent => self.health_excellent,
            HealthTier::Good => self.health_good,
            HealthTier::Fair => self.health_fair,
            HealthTier::Poor => self.health_poor,
        }
    }
}

// ---------------------------------------------------------------------------
// Lookup
// ---------------------------------------------------------------------------

/// Base expected age at death for sex and attained age, linearly
/// interpolated between knots and held flat outside the table.
pub fn base_expectancy(config: &ActuarialConfig, sex: Sex, age: u32) -> Years {
    let table = config.table(sex);
    let (Some(first), Some(last)) = (table.first(), table.last()) else {
        return Decimal::from(age);
    };
    if age <= first.age {
        return first.expected_age;
    }
    if age >= last.age {
        return last.expected_age;
    }
    for pair in table.windows(2) {
        let (lo, hi) = (pair[0], pair[1]);
        if age >= lo.age && age <= hi.age {
            let span = Decimal::from(hi.age - lo.age);
            let t = Decimal::from(age - lo.age) / span;
            return lo.expected_age + t * (hi.expected_age - lo.expected_age);
        }
    }
    last.expected_age
}

/// Adjusted life expectancy (expected age at death), one decimal place.
/// Never below `current_age + 1`.
pub fn estimate_life_expectancy(config: &ActuarialConfig, input: &LifeExpectancyInput) -> Years {
    let mut expectancy = base_expectancy(config, input.sex, input.current_age);
    if input.smoker {
        expectancy += config.smoker_adjustment;
    }
    expectancy += config.health_adjustment(input.health);
    let floor = Decimal::from(input.current_age) + Decimal::ONE;
    round1(expectancy.max(floor))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(sex: Sex, age: u32) -> LifeExpectancyInput {
        LifeExpectancyInput {
            sex,
            current_age: age,
            smoker: false,
            health: HealthTier::Good,
        }
    }

    #[test]
    fn test_floor_at_extreme_age() {
        let input = LifeExpectancyInput {
            sex: Sex::Male,
            current_age: u32::MAX,
            smoker: false,
            health: HealthTier::Good,
        };
        let le = estimate_life_expectancy(&ActuarialConfig::default(), &input);
        assert_eq!(le, Decimal::from(u32::MAX) + Decimal::ONE);
    }

    #[test]
    fn test_table_knots_exact() {
        let cfg = ActuarialConfig::default();
        assert_eq!(base_expectancy(&cfg, Sex::Male, 65), dec!(86.6));
        assert_eq!(base_expectancy(&cfg, Sex::Female, 60), dec!(90.8));
    }

    #[test]
    fn test_interpolation_between_knots() {
        let cfg = ActuarialConfig::default();
        // Halfway between 60 → 86.0 and 65 → 86.6
        assert_eq!(base_expectancy(&cfg, Sex::Male, 62), dec!(86.24));
    }

    #[test]
    fn test_clamped_outside_table() {
        let cfg = ActuarialConfig::default();
        assert_eq!(base_expectancy(&cfg, Sex::Male, 5), dec!(83.9));
        assert_eq!(base_expectancy(&cfg, Sex::Female, 110), dec!(103.3));
    }

    #[test]
    fn test_smoker_and_health_adjustments() {
        let cfg = ActuarialConfig::default();
        let mut i = input(Sex::Male, 65);
        i.smoker = true;
        i.health = HealthTier::Poor;
        assert_eq!(estimate_life_expectancy(&cfg, &i), dec!(81.6));
        i.smoker = false;
        i.health = HealthTier::Excellent;
        assert_eq!(estimate_life_expectancy(&cfg, &i), dec!(88.6));
    }

    #[test]
    fn test_floor_at_current_age_plus_one() {
        let cfg = ActuarialConfig::default();
        let mut i = input(Sex::Male, 104);
        i.smoker = true;
        assert_eq!(estimate_life_expectancy(&cfg, &i), dec!(105));
    }

    #[test]
    fn test_female_outlives_male() {
        let cfg = ActuarialConfig::default();
        for age in [25, 45, 65, 85] {
            assert!(
                estimate_life_expectancy(&cfg, &input(Sex::Female, age))
                    > estimate_life_expectancy(&cfg, &input(Sex::Male, age))
            );
        }
    }

    #[test]
    fn test_unsorted_table_rejected() {
        let mut cfg = ActuarialConfig::default();
        cfg.male.swap(0, 1);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_spanish_codes_deserialize() {
        let i: LifeExpectancyInput = serde_json::from_str(
            r#"{"sex":"femenino","current_age":40,"smoker":false,"health":"buena"}"#,
        )
        .unwrap();
        assert_eq!(i.sex, Sex::Female);
        assert_eq!(i.health, HealthTier::Good);
    }
}
