use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use super::life_expectancy::{estimate_life_expectancy, LifeExpectancyInput};
use crate::config::EngineConfig;
use crate::error::AdvisoryError;
use crate::types::{with_metadata, ComputationOutput, Money, Years};
use crate::AdvisoryResult;

const MAX_AGE: u32 = 120;

/// Request shape used by the CLI and bindings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetirementRequest {
    #[serde(flatten)]
    pub person: LifeExpectancyInput,
    pub retirement_age: u32,
    pub desired_monthly_pension: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetirementProjection {
    /// Expected age at death.
    pub life_expectancy: Years,
    pub years_in_retirement: Years,
    pub years_to_save: u32,
    /// Pension × 12 × years in retirement. No discounting, no inflation.
    pub required_capital: Money,
    /// Required capital spread evenly over the saving months, undiscounted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly_savings_needed: Option<Money>,
}

/// Project retirement needs from actuarial life expectancy.
///
/// The capital figure is a plain annuity sum: it ignores inflation and any
/// return earned during retirement.
pub fn project(
    config: &EngineConfig,
    input: &LifeExpectancyInput,
    retirement_age: u32,
    desired_monthly_pension: Money,
) -> AdvisoryResult<ComputationOutput<RetirementProjection>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.current_age > MAX_AGE {
        return Err(AdvisoryError::invalid_input(
            "current_age",
            format!("must be at most {}", MAX_AGE),
        ));
    }
    if retirement_age > MAX_AGE {
        return Err(AdvisoryError::invalid_input(
            "retirement_age",
            format!("must be at most {}", MAX_AGE),
        ));
    }
    if desired_monthly_pension < Decimal::ZERO {
        return Err(AdvisoryError::invalid_input(
            "desired_monthly_pension",
            "must be non-negative",
        ));
    }

    let life_expectancy = estimate_life_expectancy(&config.actuarial, input);
    let retirement_age_dec = Decimal::from(retirement_age);

    let years_in_retirement = (life_expectancy - retirement_age_dec).max(Decimal::ZERO);
    let years_to_save = retirement_age.saturating_sub(input.current_age);
    let required_capital = desired_monthly_pension
        .checked_mul(dec!(12))
        .and_then(|annual| annual.checked_mul(years_in_retirement))
        .ok_or_else(|| {
            AdvisoryError::invalid_input("desired_monthly_pension", "required capital overflows")
        })?;

    if input.current_age >= retirement_age {
        warnings.push(format!(
            "Current age {} is at or past the retirement age {}; no saving years remain",
            input.current_age, retirement_age
        ));
    }
    if years_in_retirement.is_zero() {
        warnings.push(format!(
            "Retirement age {} is beyond the estimated life expectancy {}",
            retirement_age, life_expectancy
        ));
    }

    let monthly_savings_needed = if years_to_save > 0 {
        Some((required_capital / Decimal::from(years_to_save * 12)).round_dp(2))
    } else {
        None
    };

    debug!(%life_expectancy, %years_in_retirement, years_to_save, "retirement projected");

    let output = RetirementProjection {
        life_expectancy,
        years_in_retirement,
        years_to_save,
        required_capital,
        monthly_savings_needed,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Retirement projection: actuarial life expectancy, undiscounted pension capital",
        &serde_json::json!({
            "config_version": config.version,
            "sex": input.sex,
            "current_age": input.current_age,
            "retirement_age": retirement_age,
            "discounting": "none",
            "inflation_adjustment": "none",
        }),
        warnings,
        elapsed,
        output,
    ))
}

/// [`project`] against the standard configuration.
pub fn project_standard(
    input: &LifeExpectancyInput,
    retirement_age: u32,
    desired_monthly_pension: Money,
) -> AdvisoryResult<ComputationOutput<RetirementProjection>> {
    project(EngineConfig::standard(), input, retirement_age, desired_monthly_pension)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retirement::life_expectancy::{HealthTier, Sex};

    fn person(sex: Sex, age: u32) -> LifeExpectancyInput {
        LifeExpectancyInput {
            sex,
            current_age: age,
            smoker: false,
            health: HealthTier::Good,
        }
    }

    #[test]
    fn test_basic_projection() {
        let cfg = EngineConfig::default();
        let out = project(&cfg, &person(Sex::Male, 65), 65, dec!(1000)).unwrap();
        let r = &out.result;
        assert_eq!(r.life_expectancy, dec!(86.6));
        assert_eq!(r.years_in_retirement, dec!(21.6));
        assert_eq!(r.years_to_save, 0);
        assert_eq!(r.required_capital, dec!(259200));
        assert!(r.monthly_savings_needed.is_none());
        assert!(!out.warnings.is_empty());
    }

    #[test]
    fn test_saving_years_and_monthly_pace() {
        let cfg = EngineConfig::default();
        let out = project(&cfg, &person(Sex::Female, 60), 65, dec!(500)).unwrap();
        let r = &out.result;
        assert_eq!(r.life_expectancy, dec!(90.8));
        assert_eq!(r.years_in_retirement, dec!(25.8));
        assert_eq!(r.years_to_save, 5);
        assert_eq!(r.required_capital, dec!(154800));
        assert_eq!(r.monthly_savings_needed, Some(dec!(2580)));
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_retirement_beyond_life_expectancy() {
        let cfg = EngineConfig::default();
        let out = project(&cfg, &person(Sex::Male, 40), 100, dec!(1000)).unwrap();
        assert_eq!(out.result.years_in_retirement, Decimal::ZERO);
        assert_eq!(out.result.required_capital, Decimal::ZERO);
        assert_eq!(out.result.years_to_save, 60);
    }

    #[test]
    fn test_negative_pension_rejected() {
        let cfg = EngineConfig::default();
        assert!(project(&cfg, &person(Sex::Male, 40), 65, dec!(-1)).is_err());
    }

    #[test]
    fn test_absurd_age_rejected() {
        let cfg = EngineConfig::default();
        assert!(project(&cfg, &person(Sex::Male, 150), 65, dec!(100)).is_err());
        assert!(project(&cfg, &person(Sex::Male, 40), 130, dec!(100)).is_err());
    }

    #[test]
    fn test_capital_overflow_rejected() {
        let cfg = EngineConfig::default();
        let err = project(&cfg, &person(Sex::Female, 30), 65, Decimal::MAX).unwrap_err();
        assert!(matches!(err, AdvisoryError::InvalidInput { .. }));
    }

    #[test]
    fn test_request_json_shape() {
        let req: RetirementRequest = serde_json::from_str(
            r#"{"sex":"male","current_age":50,"smoker":true,"health":"fair",
                "retirement_age":65,"desired_monthly_pension":"1200"}"#,
        )
        .unwrap();
        assert_eq!(req.person.sex, Sex::Male);
        assert_eq!(req.retirement_age, 65);
        assert_eq!(req.desired_monthly_pension, dec!(1200));
    }
}
