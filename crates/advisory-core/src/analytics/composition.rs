use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Instant;
use tracing::debug;

use crate::classification::fund::{classify_fund, AssetClass};
use crate::classification::region::Region;
use crate::config::EngineConfig;
use crate::error::AdvisoryError;
use crate::types::{with_metadata, ComputationOutput, Money, Percent};
use crate::AdvisoryResult;

/// Region key used for the cash line.
pub const CASH_REGION: &str = "N/A";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Holding {
    #[serde(alias = "fund_name")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security_id: Option<String>,
    pub market_value: Money,
    /// Provider category, checked before the name when classifying.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_hint: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifiedHolding {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security_id: Option<String>,
    pub market_value: Money,
    pub asset_class: AssetClass,
    /// `None` for the cash line.
    pub region: Option<Region>,
    pub percent_of_portfolio: Percent,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Bucket {
    pub value: Money,
    pub percent: Percent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioComposition {
    pub total_value: Money,
    pub holdings: Vec<ClassifiedHolding>,
    pub by_asset_class: BTreeMap<AssetClass, Bucket>,
    /// Keyed by region label, plus [`CASH_REGION`] for cash.
    pub by_region: BTreeMap<String, Bucket>,
}

fn percent_of(value: Money, total: Money) -> Percent {
    if total.is_zero() {
        Decimal::ZERO
    } else {
        (value / total * dec!(100)).round_dp(2)
    }
}

/// Classify each holding and aggregate the portfolio by asset class and
/// region. A positive cash balance is added as its own line.
pub fn portfolio_composition(
    config: &EngineConfig,
    holdings: &[Holding],
    cash_balance: Money,
) -> AdvisoryResult<ComputationOutput<PortfolioComposition>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if cash_balance < Decimal::ZERO {
        return Err(AdvisoryError::invalid_input("cash_balance", "must be non-negative"));
    }
    if let Some(h) = holdings.iter().find(|h| h.market_value < Decimal::ZERO) {
        return Err(AdvisoryError::invalid_input(
            "market_value",
            format!("holding '{}' has a negative market value", h.name),
        ));
    }

    let total_value: Money = holdings
        .iter()
        .try_fold(cash_balance, |acc, h| acc.checked_add(h.market_value))
        .ok_or_else(|| AdvisoryError::invalid_input("market_value", "portfolio total overflows"))?;
    if total_value.is_zero() {
        warnings.push("Portfolio total is zero; all percentages are 0".into());
    }

    let mut classified: Vec<ClassifiedHolding> = holdings
        .iter()
        .map(|h| {
            let c = classify_fund(config, &h.name, h.type_hint.as_deref());
            if c.asset_class == AssetClass::Other {
                warnings.push(format!("Holding '{}' could not be classified", h.name));
            }
            ClassifiedHolding {
                name: h.name.clone(),
                security_id: h.security_id.clone(),
                market_value: h.market_value,
                asset_class: c.asset_class,
                region: Some(c.region),
                percent_of_portfolio: percent_of(h.market_value, total_value),
            }
        })
        .collect();

    if cash_balance > Decimal::ZERO {
        classified.push(ClassifiedHolding {
            name: "Cash Balance".into(),
            security_id: Some("CASH".into()),
            market_value: cash_balance,
            asset_class: AssetClass::Cash,
            region: None,
            percent_of_portfolio: percent_of(cash_balance, total_value),
        });
    }

    let mut by_asset_class: BTreeMap<AssetClass, Bucket> = BTreeMap::new();
    let mut by_region: BTreeMap<String, Bucket> = BTreeMap::new();
    for h in &classified {
        by_asset_class.entry(h.asset_class).or_default().value += h.market_value;
        let key = h.region.map_or(CASH_REGION, Region::label).to_string();
        by_region.entry(key).or_default().value += h.market_value;
    }
    for bucket in by_asset_class.values_mut().chain(by_region.values_mut()) {
        bucket.percent = percent_of(bucket.value, total_value);
    }

    debug!(holdings = classified.len(), %total_value, "portfolio composed");

    let output = PortfolioComposition {
        total_value,
        holdings: classified,
        by_asset_class,
        by_region,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Portfolio composition: keyword-classified holdings aggregated by asset class and region",
        &serde_json::json!({
            "config_version": config.version,
            "holdings": holdings.len(),
            "cash_balance": cash_balance.to_string(),
        }),
        warnings,
        elapsed,
        output,
    ))
}
