use clap::{Args, ValueEnum};
use serde::Deserialize;
use serde_json::Value;

use advisory_core::analytics::metrics::analyze_window;
use advisory_core::analytics::nav::{AnalysisWindow, NavPoint};
use advisory_core::EngineConfig;

use crate::input;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum WindowArg {
    #[value(name = "1m")]
    OneMonth,
    #[value(name = "3m")]
    ThreeMonths,
    #[value(name = "6m")]
    SixMonths,
    #[value(name = "1y")]
    OneYear,
    Ytd,
    All,
}

impl From<WindowArg> for AnalysisWindow {
    fn from(w: WindowArg) -> Self {
        match w {
            WindowArg::OneMonth => AnalysisWindow::OneMonth,
            WindowArg::ThreeMonths => AnalysisWindow::ThreeMonths,
            WindowArg::SixMonths => AnalysisWindow::SixMonths,
            WindowArg::OneYear => AnalysisWindow::OneYear,
            WindowArg::Ytd => AnalysisWindow::YearToDate,
            WindowArg::All => AnalysisWindow::All,
        }
    }
}

/// Arguments for NAV analytics
#[derive(Args)]
pub struct AnalyzeArgs {
    /// Path to NAV history (.json array or .csv with date,value columns)
    #[arg(long)]
    pub input: Option<String>,

    /// Trailing window to analyse
    #[arg(long, value_enum, default_value = "all")]
    pub window: WindowArg,
}

/// A bare array of points or an object wrapping them.
#[derive(Deserialize)]
#[serde(untagged)]
enum NavInput {
    Points(Vec<NavPoint>),
    Wrapped { points: Vec<NavPoint> },
}

impl NavInput {
    fn into_points(self) -> Vec<NavPoint> {
        match self {
            NavInput::Points(p) | NavInput::Wrapped { points: p } => p,
        }
    }
}

pub fn run_analyze(args: AnalyzeArgs, config: &EngineConfig) -> Result<Value, Box<dyn std::error::Error>> {
    let points: Vec<NavPoint> = match args.input.as_deref() {
        Some(path) if input::file::is_csv(path) => input::file::read_csv(path)?,
        path => input::read_input::<NavInput>(path, "NAV analytics")?.into_points(),
    };
    let result = analyze_window(config, &points, args.window.into())?;
    Ok(serde_json::to_value(result)?)
}
