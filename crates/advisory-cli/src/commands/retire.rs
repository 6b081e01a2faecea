use clap::Args;
use serde_json::Value;

use advisory_core::retirement::projection::{project, RetirementRequest};
use advisory_core::EngineConfig;

use crate::input;

/// Arguments for the retirement projection
#[derive(Args)]
pub struct RetireArgs {
    /// Path to JSON input file
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_retire(args: RetireArgs, config: &EngineConfig) -> Result<Value, Box<dyn std::error::Error>> {
    let req: RetirementRequest = input::read_input(args.input.as_deref(), "retirement projection")?;
    let result = project(config, &req.person, req.retirement_age, req.desired_monthly_pension)?;
    Ok(serde_json::to_value(result)?)
}
