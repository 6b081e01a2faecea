use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use super::nav::{daily_returns, AnalysisWindow, DayReturn, NavPoint, NavSeries};
use crate::config::EngineConfig;
use crate::error::AdvisoryError;
use crate::types::{with_metadata, ComputationOutput, Rate};
use crate::AdvisoryResult;

/// Below this many returns the annualised figures get a warning.
const THIN_HISTORY: usize = 20;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    /// Annualisation factor for daily statistics.
    pub trading_days: u32,
    /// Left-tail probability for historical VaR (0.05 → VaR 95).
    pub var_tail: Decimal,
    /// Downside deviation used when no return is negative.
    pub downside_floor: Decimal,
    /// Standard deviations at or below this count as zero for Sharpe.
    pub zero_variance_tolerance: Decimal,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            trading_days: 252,
            var_tail: dec!(0.05),
            downside_floor: dec!(0.0001),
            zero_variance_tolerance: dec!(0.000000000001),
        }
    }
}

impl AnalyticsConfig {
    pub fn validate(&self) -> AdvisoryResult<()> {
        if self.trading_days == 0 {
            return Err(AdvisoryError::invalid_config(
                "analytics",
                "trading_days must be positive",
            ));
        }
        if self.var_tail <= Decimal::ZERO || self.var_tail >= Decimal::ONE {
            return Err(AdvisoryError::invalid_config(
                "analytics",
                "var_tail must be within (0, 1)",
            ));
        }
        if self.downside_floor <= Decimal::ZERO || self.zero_variance_tolerance < Decimal::ZERO {
            return Err(AdvisoryError::invalid_config(
                "analytics",
                "downside_floor must be positive and zero_variance_tolerance non-negative",
            ));
        }
        Ok(())
    }
}

/// Risk and return statistics of a NAV series. All rates are decimals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioMetrics {
    pub observations: usize,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub mean_daily_return: Rate,
    pub daily_volatility: Rate,
    pub annualised_volatility: Rate,
    /// `None` when the returns have no dispersion.
    pub sharpe_ratio: Option<Decimal>,
    pub sortino_ratio: Decimal,
    pub downside_deviation: Rate,
    /// Largest peak-to-trough fall, as a positive fraction of the peak.
    pub max_drawdown: Rate,
    /// Historical VaR: the signed return at the tail rank.
    pub var_95: Rate,
    pub cumulative_return: Rate,
    pub best_day: DayReturn,
    pub worst_day: DayReturn,
}

fn sqrt_decimal(val: Decimal) -> Decimal {
    if val <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    val.sqrt().unwrap_or(Decimal::ZERO)
}

/// Running-peak maximum drawdown over NAV levels.
fn max_drawdown(points: &[NavPoint]) -> Rate {
    let mut peak = points[0].value;
    let mut max_dd = Decimal::ZERO;
    for p in points {
        if p.value > peak {
            peak = p.value;
        }
        let dd = (peak - p.value) / peak;
        if dd > max_dd {
            max_dd = dd;
        }
    }
    max_dd
}

fn overflow(step: &str) -> AdvisoryError {
    AdvisoryError::invalid_input(
        "value",
        format!("NAV values are too far apart; {} overflows", step),
    )
}

/// Sum of squared deviations from `centre`, `None` on overflow.
fn sum_sq_dev<'a>(mut values: impl Iterator<Item = &'a Decimal>, centre: Decimal) -> Option<Decimal> {
    values.try_fold(Decimal::ZERO, |acc, r| {
        let dev = r.checked_sub(centre)?;
        acc.checked_add(dev.checked_mul(dev)?)
    })
}

/// Compute metrics over a validated series.
fn compute(config: &AnalyticsConfig, series: &NavSeries) -> AdvisoryResult<PortfolioMetrics> {
    let returns = daily_returns(series)?;
    let values: Vec<Decimal> = returns.iter().map(|r| r.value).collect();
    let n = values.len();
    let n_dec = Decimal::from(n as u64);
    let annualiser = sqrt_decimal(Decimal::from(config.trading_days));

    let mean = values
        .iter()
        .try_fold(Decimal::ZERO, |acc, r| acc.checked_add(*r))
        .and_then(|total| total.checked_div(n_dec))
        .ok_or_else(|| overflow("mean return"))?;
    // Population variance
    let variance = sum_sq_dev(values.iter(), mean)
        .and_then(|ss| ss.checked_div(n_dec))
        .ok_or_else(|| overflow("variance"))?;
    let daily_volatility = sqrt_decimal(variance);

    let sharpe_ratio = if daily_volatility <= config.zero_variance_tolerance {
        None
    } else {
        Some(
            mean.checked_div(daily_volatility)
                .and_then(|x| x.checked_mul(annualiser))
                .ok_or_else(|| overflow("Sharpe ratio"))?,
        )
    };

    let negatives: Vec<Decimal> = values.iter().copied().filter(|r| *r < Decimal::ZERO).collect();
    let downside_deviation = if negatives.is_empty() {
        config.downside_floor
    } else {
        let sum_sq = sum_sq_dev(negatives.iter(), Decimal::ZERO)
            .and_then(|ss| ss.checked_div(Decimal::from(negatives.len() as u64)))
            .ok_or_else(|| overflow("downside deviation"))?;
        let rms = sqrt_decimal(sum_sq);
        if rms.is_zero() {
            config.downside_floor
        } else {
            rms
        }
    };
    let sortino_ratio = mean
        .checked_div(downside_deviation)
        .and_then(|x| x.checked_mul(annualiser))
        .ok_or_else(|| overflow("Sortino ratio"))?;
    let annualised_volatility = daily_volatility
        .checked_mul(annualiser)
        .ok_or_else(|| overflow("annualised volatility"))?;

    let mut sorted = values.clone();
    sorted.sort();
    let var_index = (config.var_tail * n_dec)
        .floor()
        .to_usize()
        .unwrap_or(0)
        .min(n - 1);
    let var_95 = sorted[var_index];

    // Strict comparisons keep the first occurrence on ties
    let mut best = returns[0];
    let mut worst = returns[0];
    for r in &returns[1..] {
        if r.value > best.value {
            best = *r;
        }
        if r.value < worst.value {
            worst = *r;
        }
    }

    let first = series.first();
    let last = series.last();
    let cumulative_return = last
        .value
        .checked_div(first.value)
        .ok_or_else(|| overflow("cumulative return"))?
        - Decimal::ONE;

    Ok(PortfolioMetrics {
        observations: n,
        start_date: first.date,
        end_date: last.date,
        mean_daily_return: mean,
        daily_volatility,
        annualised_volatility,
        sharpe_ratio,
        sortino_ratio,
        downside_deviation,
        max_drawdown: max_drawdown(series.points()),
        var_95,
        cumulative_return,
        best_day: best,
        worst_day: worst,
    })
}

/// Risk/return statistics over the trailing `window` of a NAV history.
pub fn analyze_window(
    config: &EngineConfig,
    points: &[NavPoint],
    window: AnalysisWindow,
) -> AdvisoryResult<ComputationOutput<PortfolioMetrics>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();
    let analytics = &config.analytics;

    let series = NavSeries::new(window.trim(points))?;
    let output = compute(analytics, &series)?;

    if output.observations < THIN_HISTORY {
        warnings.push(format!(
            "Only {} daily returns; annualised figures are unreliable",
            output.observations
        ));
    }
    if output.sharpe_ratio.is_none() {
        warnings.push("Returns have no dispersion; Sharpe ratio undefined".into());
    }

    debug!(
        observations = output.observations,
        %window,
        "nav series analysed"
    );

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "NAV analytics: population volatility, Sharpe/Sortino (rf = 0), running-peak drawdown, historical VaR",
        &serde_json::json!({
            "config_version": config.version,
            "window": window,
            "trading_days": analytics.trading_days,
            "var_tail": analytics.var_tail.to_string(),
            "risk_free_rate": "0",
        }),
        warnings,
        elapsed,
        output,
    ))
}

/// [`analyze_window`] over the whole history.
pub fn analyze(
    config: &EngineConfig,
    points: &[NavPoint],
) -> AdvisoryResult<ComputationOutput<PortfolioMetrics>> {
    analyze_window(config, points, AnalysisWindow::All)
}

/// [`analyze`] against the standard configuration.
pub fn analyze_standard(points: &[NavPoint]) -> AdvisoryResult<ComputationOutput<PortfolioMetrics>> {
    analyze(EngineConfig::standard(), points)
}
