mod commands;
mod input;
mod output;
mod settings;
mod store;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::market::MarketArgs;
use commands::pricing::{BreakdownArgs, CalculateArgs};
use commands::sensitivity::SensitivityArgs;
use commands::simulation::SimulateArgs;
use commands::snapshots::SnapshotCommand;
use settings::Settings;

/// Session pricing, break-even and what-if simulation for Pilates studios
#[derive(Parser)]
#[command(
    name = "voll",
    version,
    about = "Session pricing, break-even and what-if simulation for Pilates studios",
    long_about = "Prices a studio session from monthly fixed costs, revenue-proportional \
                  costs, a profit target and studio capacity. Reports break-even, package \
                  prices, reserve planning and a price breakdown, simulates alternative \
                  package prices and occupancy, and keeps named snapshots of inputs."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Settings file (defaults to ./voll.toml when present)
    #[arg(long, global = true)]
    config: Option<String>,

    /// Log debug details to stderr
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Price a session and report break-even, packages and reserve planning
    Calculate(CalculateArgs),
    /// Split the session price into fixed, variable, reserve and profit shares
    Breakdown(BreakdownArgs),
    /// Simulate revenue and margin for other package prices or occupancy
    Simulate(SimulateArgs),
    /// Compare the twice-a-week package with surveyed competitors
    Market(MarketArgs),
    /// Run a sensitivity grid over one or two input fields
    Sensitivity(SensitivityArgs),
    /// Save, list, show and delete named calculations
    #[command(subcommand)]
    Snapshot(SnapshotCommand),
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

/// Log to stderr. `VOLL_LOG` wins over `--verbose`, which wins over settings.
fn init_tracing(settings: &Settings, verbose: bool) {
    let fallback = if verbose {
        "debug"
    } else {
        settings.log_level.as_str()
    };
    let filter = EnvFilter::try_from_env("VOLL_LOG")
        .or_else(|_| EnvFilter::try_new(fallback))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();

    let settings = match Settings::load(cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("{}: invalid settings: {}", "error".red().bold(), e);
            process::exit(1);
        }
    };
    init_tracing(&settings, cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Calculate(args) => commands::pricing::run_calculate(args),
        Commands::Breakdown(args) => commands::pricing::run_breakdown(args),
        Commands::Simulate(args) => commands::simulation::run_simulate(args),
        Commands::Market(args) => commands::market::run_market(args),
        Commands::Sensitivity(args) => commands::sensitivity::run_sensitivity(args),
        Commands::Snapshot(command) => commands::snapshots::run_snapshot(command, &settings),
        Commands::Version => {
            println!("voll {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value, settings.currency().code());
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
