//! nestbase
//!
//! Generates NestJS entity, DTO and service base classes from a Prisma data
//! model.
//!
//! This is the entry point of the `nestbase` binary.

use clap::Parser;
use colored::Colorize;
use nestbase_cli::{Cli, VERSION, print_summary, run};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging; RUST_LOG takes precedence over -v
    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    println!("{} {}", "nestbase".cyan().bold(), format!("v{}", VERSION).dimmed());
    println!();

    match run(&cli).await {
        Ok(summary) => print_summary(&summary),
        Err(e) => {
            eprintln!("{} {:#}", "error:".red().bold(), e);
            std::process::exit(1);
        }
    }
}
