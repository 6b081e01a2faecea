use clap::Args;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

use advisory_core::analytics::composition::{portfolio_composition, Holding};
use advisory_core::EngineConfig;

use crate::input;

/// Arguments for portfolio composition
#[derive(Args)]
pub struct CompositionArgs {
    /// Path to JSON file with holdings and an optional cash balance
    #[arg(long)]
    pub input: Option<String>,
}

#[derive(Deserialize)]
struct CompositionInput {
    holdings: Vec<Holding>,
    #[serde(default)]
    cash_balance: Decimal,
}

pub fn run_composition(args: CompositionArgs, config: &EngineConfig) -> Result<Value, Box<dyn std::error::Error>> {
    let req: CompositionInput = input::read_input(args.input.as_deref(), "portfolio composition")?;
    let result = portfolio_composition(config, &req.holdings, req.cash_balance)?;
    Ok(serde_json::to_value(result)?)
}
