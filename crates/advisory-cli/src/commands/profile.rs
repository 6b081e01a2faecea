use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use advisory_core::profiling::questionnaire::AnswerMap;
use advisory_core::profiling::scoring::{self, life_expectancy_input, wants_retirement_projection};
use advisory_core::retirement::projection;
use advisory_core::EngineConfig;

use crate::input;

/// Arguments for risk-profile scoring
#[derive(Args)]
pub struct ScoreArgs {
    /// Path to JSON answers file (question id → code or 1-5 value)
    #[arg(long)]
    pub input: Option<String>,

    /// Current age, needed for the retirement projection
    #[arg(long)]
    pub age: Option<u32>,

    /// Planned retirement age
    #[arg(long, default_value = "65")]
    pub retirement_age: u32,

    /// Desired monthly pension
    #[arg(long)]
    pub pension: Option<Decimal>,
}

pub fn run_questionnaire(config: &EngineConfig) -> Result<Value, Box<dyn std::error::Error>> {
    Ok(serde_json::json!({
        "version": config.version,
        "questions": config.profiling.questions,
    }))
}

pub fn run_score(args: ScoreArgs, config: &EngineConfig) -> Result<Value, Box<dyn std::error::Error>> {
    let answers: AnswerMap = input::read_input(args.input.as_deref(), "risk-profile scoring")?;
    let result = scoring::score(config, &answers)?;
    let mut value = serde_json::to_value(result)?;

    // A retirement goal adds the projection when age and pension are known
    if wants_retirement_projection(&answers) {
        if let (Some(age), Some(pension)) = (args.age, args.pension) {
            match life_expectancy_input(&answers, age) {
                Some(person) => {
                    let projection =
                        projection::project(config, &person, args.retirement_age, pension)?;
                    value["retirement"] = serde_json::to_value(projection)?;
                }
                None => tracing::warn!("retirement goal selected but sex was not answered"),
            }
        }
    }
    Ok(value)
}
