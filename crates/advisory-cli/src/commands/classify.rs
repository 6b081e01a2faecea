use clap::Args;
use serde_json::Value;

use advisory_core::classification::fund::classify_fund;
use advisory_core::EngineConfig;

/// Arguments for fund classification
#[derive(Args)]
pub struct ClassifyArgs {
    /// Fund name as published by the provider
    #[arg(long)]
    pub label: String,

    /// Provider category or family, checked before the name
    #[arg(long)]
    pub hint: Option<String>,
}

pub fn run_classify(args: ClassifyArgs, config: &EngineConfig) -> Result<Value, Box<dyn std::error::Error>> {
    let result = classify_fund(config, &args.label, args.hint.as_deref());
    Ok(serde_json::json!({
        "label": args.label,
        "result": result,
    }))
}
