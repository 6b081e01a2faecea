//! Keyword classification of fund names into asset classes and regions.
//!
//! Fund catalogues label products inconsistently and in more than one
//! language, so classification is a plain ordered scan of keyword rules over
//! the lower-cased text. The optional type hint (a provider's "family" or
//! category field) is consulted before the fund name.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use super::region::{default_region_rules, match_region, Region, RegionRule};
use crate::config::EngineConfig;
use crate::error::AdvisoryError;
use crate::AdvisoryResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetClass {
    Equity,
    FixedIncome,
    Balanced,
    Alternatives,
    Other,
    /// Uninvested cash. Never produced by [`classify_fund`]; portfolio
    /// composition uses it for cash balances.
    Cash,
}

impl AssetClass {
    pub fn label(self) -> &'static str {
        match self {
            AssetClass::Equity => "Equity",
            AssetClass::FixedIncome => "Fixed Income",
            AssetClass::Balanced => "Balanced",
            AssetClass::Alternatives => "Alternatives",
            AssetClass::Other => "Other",
            AssetClass::Cash => "Cash",
        }
    }
}

impl fmt::Display for AssetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Where the asset-class match came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchSource {
    Hint,
    Label,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FundClassification {
    pub asset_class: AssetClass,
    pub region: Region,
    /// Keyword that decided the asset class, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_keyword: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_on: Option<MatchSource>,
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetClassRule {
    pub asset_class: AssetClass,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Scanned in order; the first rule with a matching keyword wins.
    pub asset_class_rules: Vec<AssetClassRule>,
    pub region_rules: Vec<RegionRule>,
}

fn class_rule(asset_class: AssetClass, keywords: &[&str]) -> AssetClassRule {
    AssetClassRule {
        asset_class,
        keywords: keywords.iter().map(|s| s.to_string()).collect(),
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            asset_class_rules: vec![
                class_rule(
                    AssetClass::Equity,
                    &["accionario", "renta variable", "equity", "stock"],
                ),
                class_rule(
                    AssetClass::FixedIncome,
                    &["deuda", "renta fija", "bond", "fixed income", "money market"],
                ),
                class_rule(AssetClass::Balanced, &["balanceado", "balanced"]),
                class_rule(
                    AssetClass::Alternatives,
                    &["estructurado", "otro", "alternativ"],
                ),
            ],
            region_rules: default_region_rules(),
        }
    }
}

impl ClassifierConfig {
    pub fn validate(&self) -> AdvisoryResult<()> {
        for r in &self.asset_class_rules {
            if r.asset_class == AssetClass::Cash || r.asset_class == AssetClass::Other {
                return Err(AdvisoryError::invalid_config(
                    "classifier",
                    format!("rules cannot target {}", r.asset_class),
                ));
            }
            if r.keywords.is_empty() || r.keywords.iter().any(|k| k.trim().is_empty()) {
                return Err(AdvisoryError::invalid_config(
                    "classifier",
                    format!("{} rule has an empty keyword list or keyword", r.asset_class),
                ));
            }
        }
        for r in &self.region_rules {
            if r.fragments.iter().chain(r.words.iter()).any(|k| k.trim().is_empty()) {
                return Err(AdvisoryError::invalid_config(
                    "classifier",
                    format!("{} region rule has an empty keyword", r.region),
                ));
            }
        }
        Ok(())
    }

    fn match_class(&self, text: &str) -> Option<(AssetClass, &str)> {
        let lower = text.to_lowercase();
        self.asset_class_rules.iter().find_map(|rule| {
            rule.keywords
                .iter()
                .find(|k| lower.contains(&k.to_lowercase()))
                .map(|k| (rule.asset_class, k.as_str()))
        })
    }
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Classify a fund by its name and an optional provider type hint.
///
/// Total: every input, the empty string included, yields one asset class
/// (falling back to [`AssetClass::Other`]) and one region (falling back to
/// [`Region::Global`]).
pub fn classify_fund(config: &EngineConfig, label: &str, type_hint: Option<&str>) -> FundClassification {
    let rules = &config.classifier;

    let hit = type_hint
        .and_then(|h| rules.match_class(h).map(|m| (m, MatchSource::Hint)))
        .or_else(|| rules.match_class(label).map(|m| (m, MatchSource::Label)));

    let region = match_region(&rules.region_rules, label);

    match hit {
        Some(((asset_class, keyword), source)) => {
            debug!(label, %asset_class, keyword, "fund classified");
            FundClassification {
                asset_class,
                region,
                matched_keyword: Some(keyword.to_string()),
                matched_on: Some(source),
            }
        }
        None => FundClassification {
            asset_class: AssetClass::Other,
            region,
            matched_keyword: None,
            matched_on: None,
        },
    }
}

/// [`classify_fund`] against the standard configuration.
pub fn classify_standard(label: &str, type_hint: Option<&str>) -> FundClassification {
    classify_fund(EngineConfig::standard(), label, type_hint)
}
