use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod config;
mod output;
mod run;

use output::Format;

#[derive(Parser, Debug)]
#[command(
    name = "tally",
    version,
    about = "Normalize bank statements and report monthly earnings and expenses"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Normalize all configured statements and print per-month reports
    Report {
        /// Path to the run configuration
        #[arg(long, default_value = "tally.toml")]
        config: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: Format,
    },

    /// Validate column mappings and bank routing without reading statements
    Check {
        /// Path to the run configuration
        #[arg(long, default_value = "tally.toml")]
        config: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Report { config, format } => {
            let rendered = run::run_report(&config, format)?;
            println!("{rendered}");
        }
        Command::Check { config } => {
            let rendered = run::run_check(&config)?;
            println!("{rendered}");
        }
    }
    Ok(())
}
