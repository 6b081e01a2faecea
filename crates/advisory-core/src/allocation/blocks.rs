use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::benchmark::AssetAllocation;
use crate::types::Percent;

/// One investable building block of the benchmark, tied to a reference index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockId {
    EquityChile,
    EquityLatamExChile,
    EquityUsa,
    EquityEurope,
    EquityAsiaDev,
    EquityEmergentes,
    #[serde(alias = "fi_chile_short")]
    FiLocalShort,
    #[serde(alias = "fi_chile_long")]
    FiLocalLong,
    FiGlobalIg,
    FiGlobalHy,
    FiInflationLinked,
    AltRealEstate,
    AltInfrastructure,
    AltOthers,
}

/// Top-level bucket a block belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockGroup {
    Equities,
    FixedIncome,
    Alternatives,
}

impl BlockId {
    pub const ALL: [BlockId; 14] = [
        BlockId::EquityChile,
        BlockId::EquityLatamExChile,
        BlockId::EquityUsa,
        BlockId::EquityEurope,
        BlockId::EquityAsiaDev,
        BlockId::EquityEmergentes,
        BlockId::FiLocalShort,
        BlockId::FiLocalLong,
        BlockId::FiGlobalIg,
        BlockId::FiGlobalHy,
        BlockId::FiInflationLinked,
        BlockId::AltRealEstate,
        BlockId::AltInfrastructure,
        BlockId::AltOthers,
    ];

    pub fn group(self) -> BlockGroup {
        use BlockId::*;
        match self {
            EquityChile | EquityLatamExChile | EquityUsa | EquityEurope | EquityAsiaDev
            | EquityEmergentes => BlockGroup::Equities,
            FiLocalShort | FiLocalLong | FiGlobalIg | FiGlobalHy | FiInflationLinked => {
                BlockGroup::FixedIncome
            }
            AltRealEstate | AltInfrastructure | AltOthers => BlockGroup::Alternatives,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BlockId::EquityChile => "Chile Equities",
            BlockId::EquityLatamExChile => "LatAm ex Chile Equities",
            BlockId::EquityUsa => "US Equities",
            BlockId::EquityEurope => "European Equities",
            BlockId::EquityAsiaDev => "Developed Asia Equities",
            BlockId::EquityEmergentes => "Emerging Markets Equities",
            BlockId::FiLocalShort => "Local Fixed Income, Short",
            BlockId::FiLocalLong => "Local Fixed Income, Long",
            BlockId::FiGlobalIg => "Global Investment Grade",
            BlockId::FiGlobalHy => "Global High Yield",
            BlockId::FiInflationLinked => "Inflation-Linked Bonds",
            BlockId::AltRealEstate => "Listed Real Estate",
            BlockId::AltInfrastructure => "Infrastructure",
            BlockId::AltOthers => "Other Alternatives",
        }
    }

    /// Reference index the block is benchmarked against.
    pub fn index_name(self) -> &'static str {
        match self {
            BlockId::EquityChile => "S&P IPSA TR CLP",
            BlockId::EquityLatamExChile => "MSCI EM Latin America NR USD",
            BlockId::EquityUsa => "MSCI USA NR USD",
            BlockId::EquityEurope => "MSCI Europe NR EUR",
            BlockId::EquityAsiaDev => "MSCI Pacific NR USD",
            BlockId::EquityEmergentes => "MSCI Emerging Markets NR USD",
            BlockId::FiLocalShort => "Local government bonds CLP 1-3y (proxy)",
            BlockId::FiLocalLong => "Local government bonds UF 5y+ (proxy)",
            BlockId::FiGlobalIg => "Bloomberg Global Aggregate TR USD",
            BlockId::FiGlobalHy => "Bloomberg Global High Yield TR USD",
            BlockId::FiInflationLinked => "Bloomberg Global Inflation-Linked TR",
            BlockId::AltRealEstate => "FTSE EPRA Nareit Developed NR",
            BlockId::AltInfrastructure => "FTSE Global Core Infrastructure 50/50",
            BlockId::AltOthers => "HFRX Global Hedge Fund Index (proxy)",
        }
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Portfolio-level weight of one block, in percentage points.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockWeight {
    pub block: BlockId,
    pub group: BlockGroup,
    pub label: String,
    pub index_name: String,
    pub weight: Percent,
}

/// Flatten an allocation into portfolio-level block weights.
///
/// Each block weight is its group's top-level weight times its share within
/// the group, rounded to two decimals. Alternative blocks are omitted when
/// the allocation excludes alternatives.
pub fn benchmark_blocks(allocation: &AssetAllocation) -> Vec<BlockWeight> {
    let eq = allocation.weights.equities;
    let fi = allocation.weights.fixed_income;
    let alt = allocation.weights.alternatives;
    let r = &allocation.equity_regions;
    let b = &allocation.fixed_income_buckets;
    let a = &allocation.alternative_buckets;

    let mut rows: Vec<(BlockId, Decimal, Decimal)> = vec![
        (BlockId::EquityChile, eq, r.chile),
        (BlockId::EquityLatamExChile, eq, r.latam_ex_chile),
        (BlockId::EquityUsa, eq, r.usa),
        (BlockId::EquityEurope, eq, r.europe),
        (BlockId::EquityAsiaDev, eq, r.asia_dev),
        (BlockId::EquityEmergentes, eq, r.emergentes),
        (BlockId::FiLocalShort, fi, b.local_short),
        (BlockId::FiLocalLong, fi, b.local_long),
        (BlockId::FiGlobalIg, fi, b.global_ig),
        (BlockId::FiGlobalHy, fi, b.global_hy),
        (BlockId::FiInflationLinked, fi, b.inflation_linked),
    ];
    if allocation.include_alternatives {
        rows.extend([
            (BlockId::AltRealEstate, alt, a.real_estate),
            (BlockId::AltInfrastructure, alt, a.infrastructure),
            (BlockId::AltOthers, alt, a.others),
        ]);
    }

    rows.into_iter()
        .map(|(block, group_weight, share)| BlockWeight {
            block,
            group: block.group(),
            label: block.label().to_string(),
            index_name: block.index_name().to_string(),
            weight: (group_weight * share / dec!(100)).round_dp(2).normalize(),
        })
        .collect()
}
