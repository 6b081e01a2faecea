mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use advisory_core::EngineConfig;
use commands::allocate::AllocateArgs;
use commands::analyze::AnalyzeArgs;
use commands::classify::ClassifyArgs;
use commands::composition::CompositionArgs;
use commands::profile::ScoreArgs;
use commands::retire::RetireArgs;
use commands::tilt::{CompareArgs, TiltArgs};

/// Risk profiling and benchmark construction for advisory portfolios
#[derive(Parser)]
#[command(
    name = "advisory",
    version,
    about = "Risk profiling and benchmark construction for advisory portfolios",
    long_about = "A CLI for scoring investor risk questionnaires, building strategic \
                  benchmarks, classifying model tilts and funds, projecting retirement \
                  capital and analysing NAV histories, with decimal precision."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Engine configuration file (.json, .yaml or .yml)
    #[arg(long, global = true)]
    config: Option<String>,

    /// Log computation details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify a fund into an asset class and region
    Classify(ClassifyArgs),
    /// Print the risk questionnaire
    Questionnaire,
    /// Score questionnaire answers into a risk profile
    Score(ScoreArgs),
    /// Build the strategic benchmark for a risk score
    Allocate(AllocateArgs),
    /// Classify one model weight against its neutral weight
    Tilt(TiltArgs),
    /// Compare a model portfolio block by block with the benchmark
    Compare(CompareArgs),
    /// Project retirement capital from life expectancy
    Retire(RetireArgs),
    /// Risk/return statistics of a NAV history
    Analyze(AnalyzeArgs),
    /// Classify holdings and aggregate by asset class and region
    Composition(CompositionArgs),
    /// Print the effective engine configuration
    Config,
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| level.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_config(path: Option<&str>) -> Result<EngineConfig, Box<dyn std::error::Error>> {
    match path {
        Some(path) => input::file::read_config(path),
        None => Ok(EngineConfig::standard().clone()),
    }
}

fn dispatch(
    command: Commands,
    config: &EngineConfig,
) -> Result<serde_json::Value, Box<dyn std::error::Error>> {
    match command {
        Commands::Classify(args) => commands::classify::run_classify(args, config),
        Commands::Questionnaire => commands::profile::run_questionnaire(config),
        Commands::Score(args) => commands::profile::run_score(args, config),
        Commands::Allocate(args) => commands::allocate::run_allocate(args, config),
        Commands::Tilt(args) => commands::tilt::run_tilt(args, config),
        Commands::Compare(args) => commands::tilt::run_compare(args, config),
        Commands::Retire(args) => commands::retire::run_retire(args, config),
        Commands::Analyze(args) => commands::analyze::run_analyze(args, config),
        Commands::Composition(args) => commands::composition::run_composition(args, config),
        Commands::Config => commands::config::run_config(config),
        Commands::Version => Ok(serde_json::json!({ "version": env!("CARGO_PKG_VERSION") })),
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Version => {
            println!("advisory {}", env!("CARGO_PKG_VERSION"));
            return;
        }
        // The config is loaded and validated once, before any command runs
        command => load_config(cli.config.as_deref()).and_then(|config| dispatch(command, &config)),
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
