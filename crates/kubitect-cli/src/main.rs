//! Kubitect CLI
//!
//! Compares an applied cluster configuration with a new one and decides
//! whether the change may be applied.

use clap::{Parser, Subcommand, ValueEnum};
use kubitect_core::logging_facility::{self, Profile};

mod commands;
mod ui;

#[derive(Debug, Parser)]
#[command(name = "kubitect")]
#[command(about = "Kubitect - cluster configuration diff and apply policy", long_about = None)]
struct Cli {
    /// Log output format (filter with RUST_LOG)
    #[arg(long, value_enum, default_value_t = LogFormat::Human, global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormat {
    Human,
    Json,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Show the changes between two configurations and the events they trigger
    Plan(commands::plan::PlanArgs),
    /// Enforce the apply policy and hand the approved pipeline off
    Apply(commands::apply::ApplyArgs),
}

fn main() {
    let cli = Cli::parse();

    logging_facility::init(match cli.log_format {
        LogFormat::Human => Profile::Development,
        LogFormat::Json => Profile::Production,
    });

    let result = match cli.command {
        Commands::Plan(args) => commands::plan::execute(args),
        Commands::Apply(args) => commands::apply::execute(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
