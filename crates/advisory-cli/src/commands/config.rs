use serde_json::Value;

use advisory_core::EngineConfig;

/// The effective configuration, already validated at startup.
pub fn run_config(config: &EngineConfig) -> Result<Value, Box<dyn std::error::Error>> {
    Ok(serde_json::to_value(config)?)
}
