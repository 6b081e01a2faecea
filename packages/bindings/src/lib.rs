use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::BTreeMap;

use advisory_core::allocation::benchmark::{AssetAllocation, Universe};
use advisory_core::allocation::blocks::{BlockId, BlockWeight};
use advisory_core::analytics::composition::Holding;
use advisory_core::analytics::nav::{AnalysisWindow, NavPoint};
use advisory_core::profiling::questionnaire::AnswerMap;
use advisory_core::retirement::projection::RetirementRequest;
use advisory_core::EngineConfig;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn parse<T: for<'de> Deserialize<'de>>(input_json: &str) -> NapiResult<T> {
    serde_json::from_str(input_json).map_err(to_napi_error)
}

fn config() -> &'static EngineConfig {
    EngineConfig::standard()
}

fn default_true() -> bool {
    true
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct ClassifyRequest {
    label: String,
    #[serde(default)]
    hint: Option<String>,
}

#[napi]
pub fn classify_fund(input_json: String) -> NapiResult<String> {
    let req: ClassifyRequest = parse(&input_json)?;
    let output = advisory_core::classification::fund::classify_fund(
        config(),
        &req.label,
        req.hint.as_deref(),
    );
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Profiling
// ---------------------------------------------------------------------------

#[napi]
pub fn score_risk_profile(input_json: String) -> NapiResult<String> {
    let answers: AnswerMap = parse(&input_json)?;
    let output =
        advisory_core::profiling::scoring::score(config(), &answers).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Allocation
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct AllocateRequest {
    score: Decimal,
    #[serde(default = "default_true")]
    include_alternatives: bool,
    #[serde(default)]
    universe: Universe,
}

#[napi]
pub fn allocate_benchmark(input_json: String) -> NapiResult<String> {
    let req: AllocateRequest = parse(&input_json)?;
    let output = advisory_core::allocation::benchmark::allocate(
        config(),
        req.score,
        req.include_alternatives,
        req.universe,
    )
    .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn benchmark_blocks(input_json: String) -> NapiResult<String> {
    let allocation: AssetAllocation = parse(&input_json)?;
    let output = advisory_core::allocation::blocks::benchmark_blocks(&allocation);
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[derive(Deserialize)]
struct TiltRequest {
    neutral: Decimal,
    model: Decimal,
}

#[napi]
pub fn classify_tilt(input_json: String) -> NapiResult<String> {
    let req: TiltRequest = parse(&input_json)?;
    let output = advisory_core::allocation::tilt::classify_tilt(&config().tilt, req.neutral, req.model);
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[derive(Deserialize)]
struct CompareRequest {
    benchmark: Vec<BlockWeight>,
    model: BTreeMap<BlockId, Decimal>,
}

#[napi]
pub fn compare_model(input_json: String) -> NapiResult<String> {
    let req: CompareRequest = parse(&input_json)?;
    let output =
        advisory_core::allocation::tilt::compare_model(&config().tilt, &req.benchmark, &req.model)
            .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Retirement
// ---------------------------------------------------------------------------

#[napi]
pub fn project_retirement(input_json: String) -> NapiResult<String> {
    let req: RetirementRequest = parse(&input_json)?;
    let output = advisory_core::retirement::projection::project(
        config(),
        &req.person,
        req.retirement_age,
        req.desired_monthly_pension,
    )
    .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Analytics
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct NavRequest {
    points: Vec<NavPoint>,
    #[serde(default)]
    window: AnalysisWindow,
}

#[napi]
pub fn analyze_nav(input_json: String) -> NapiResult<String> {
    let req: NavRequest = parse(&input_json)?;
    let output = advisory_core::analytics::metrics::analyze_window(config(), &req.points, req.window)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[derive(Deserialize)]
struct CompositionRequest {
    holdings: Vec<Holding>,
    #[serde(default)]
    cash_balance: Decimal,
}

#[napi]
pub fn portfolio_composition(input_json: String) -> NapiResult<String> {
    let req: CompositionRequest = parse(&input_json)?;
    let output = advisory_core::analytics::composition::portfolio_composition(
        config(),
        &req.holdings,
        req.cash_balance,
    )
    .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
