use clap::Args;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

use advisory_core::allocation::benchmark::{allocate, Universe};
use advisory_core::allocation::blocks::{benchmark_blocks, BlockId, BlockWeight};
use advisory_core::allocation::tilt::{classify_tilt, compare_model};
use advisory_core::EngineConfig;

use crate::input;

/// Arguments for a single tilt classification
#[derive(Args)]
pub struct TiltArgs {
    /// Neutral (benchmark) weight in percentage points
    #[arg(long, allow_hyphen_values = true)]
    pub neutral: Decimal,

    /// Model weight in percentage points
    #[arg(long, allow_hyphen_values = true)]
    pub model: Decimal,
}

/// Arguments for a model-vs-benchmark comparison
#[derive(Args)]
pub struct CompareArgs {
    /// Path to JSON comparison file
    #[arg(long)]
    pub input: Option<String>,
}

/// Either an explicit benchmark or the inputs to build one, plus the model.
#[derive(Debug, Deserialize)]
struct CompareInput {
    #[serde(default)]
    benchmark: Option<Vec<BlockWeight>>,
    #[serde(default)]
    score: Option<Decimal>,
    #[serde(default = "default_true")]
    include_alternatives: bool,
    #[serde(default)]
    universe: Universe,
    model: BTreeMap<BlockId, Decimal>,
}

fn default_true() -> bool {
    true
}

pub fn run_tilt(args: TiltArgs, config: &EngineConfig) -> Result<Value, Box<dyn std::error::Error>> {
    let info = classify_tilt(&config.tilt, args.neutral, args.model);
    Ok(serde_json::json!({ "result": info }))
}

pub fn run_compare(args: CompareArgs, config: &EngineConfig) -> Result<Value, Box<dyn std::error::Error>> {
    let req: CompareInput = input::read_input(args.input.as_deref(), "model comparison")?;
    let blocks = match (req.benchmark, req.score) {
        (Some(blocks), _) => blocks,
        (None, Some(score)) => {
            let allocation = allocate(config, score, req.include_alternatives, req.universe)?;
            benchmark_blocks(&allocation.result)
        }
        (None, None) => return Err("comparison needs either 'benchmark' or 'score'".into()),
    };
    let result = compare_model(&config.tilt, &blocks, &req.model)?;
    Ok(serde_json::to_value(result)?)
}
