mod commands;
mod input;
mod logging;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::compute::ComputeArgs;
use commands::plans::{CompareArgs, PlansArgs, UpdateArgs};

/// Installment financing calculations
#[derive(Parser)]
#[command(
    name = "instcalc",
    version,
    about = "Installment financing calculations",
    long_about = "A CLI for pricing installment plans with decimal precision. \
                  Supports flat-rate, reducing-balance and profit-based (Islamic) \
                  financing, repricing stored plan sets and comparing plans."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log recalculation details to stderr (RUST_LOG takes precedence)
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Price a single plan
    Compute(ComputeArgs),
    /// Recalculate a stored plan set, optionally at a new cash price
    Plans(PlansArgs),
    /// Edit one field of one plan and recalculate it
    Update(UpdateArgs),
    /// Compare the plans offered on one product
    Compare(CompareArgs),
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

fn main() {
    let cli = Cli::parse();
    logging::init_tracing(cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Compute(args) => commands::compute::run_compute(args),
        Commands::Plans(args) => commands::plans::run_plans(args),
        Commands::Update(args) => commands::plans::run_update(args),
        Commands::Compare(args) => commands::plans::run_compare(args),
        Commands::Version => {
            println!("instcalc {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
