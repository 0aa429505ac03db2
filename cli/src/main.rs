#![deny(missing_docs)]

//! # oaslink CLI
//!
//! Command line front end over `oaslink-core`: prints the schema export plan of
//! an OpenAPI document, or checks that the document resolves cleanly.

use clap::{Parser, Subcommand};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod check;
mod error;
mod loader;
mod plan;

/// OpenAPI reference resolution and export planning.
#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Cli {
    /// Default log filter, used when `RUST_LOG` is unset.
    #[clap(long, global = true, env = "OASLINK_LOG", default_value = "warn")]
    log_level: String,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the export name of every component schema.
    Plan(plan::PlanArgs),
    /// Resolve, plan and walk all operations, reporting the first failure.
    Check(check::CheckArgs),
}

fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let result = match &cli.command {
        Commands::Plan(args) => plan::execute(args),
        Commands::Check(args) => check::execute(args),
    };

    match result {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
