use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::Value;

use advisory_core::allocation::benchmark::{allocate, Universe};
use advisory_core::allocation::blocks::benchmark_blocks;
use advisory_core::EngineConfig;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum UniverseArg {
    Global,
    LocalOnly,
}

impl From<UniverseArg> for Universe {
    fn from(u: UniverseArg) -> Self {
        match u {
            UniverseArg::Global => Universe::Global,
            UniverseArg::LocalOnly => Universe::LocalOnly,
        }
    }
}

/// Arguments for benchmark allocation
#[derive(Args)]
pub struct AllocateArgs {
    /// Global risk score (0-100)
    #[arg(long)]
    pub score: Decimal,

    /// Investable universe
    #[arg(long, value_enum, default_value = "global")]
    pub universe: UniverseArg,

    /// Exclude alternatives and redistribute their budget
    #[arg(long)]
    pub no_alternatives: bool,

    /// Also list portfolio-level block weights
    #[arg(long)]
    pub blocks: bool,
}

pub fn run_allocate(args: AllocateArgs, config: &EngineConfig) -> Result<Value, Box<dyn std::error::Error>> {
    let result = allocate(config, args.score, !args.no_alternatives, args.universe.into())?;
    let blocks = args.blocks.then(|| benchmark_blocks(&result.result));
    let mut value = serde_json::to_value(&result)?;
    if let Some(blocks) = blocks {
        value["blocks"] = serde_json::to_value(blocks)?;
    }
    Ok(value)
}
