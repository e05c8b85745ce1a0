//! `corpografo-cli`: catalog checks without opening the console

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use colored::Colorize;
use corpografo_cli::{CheckReport, check_catalog, route_surface};

#[derive(Debug, Parser)]
#[command(name = "corpografo-cli", version, about = "Corpografo console tools")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Validate an entity catalog and summarise its pages
    Check {
        /// Catalog file (the built-in catalog when omitted)
        #[arg(long, env = "CORPOGRAFO_SCHEMA")]
        schema: Option<PathBuf>,
    },
    /// Print the route surface of a catalog
    Routes {
        #[arg(long, env = "CORPOGRAFO_SCHEMA")]
        schema: Option<PathBuf>,
    },
}

fn print_report(report: &CheckReport) {
    println!("{} {}", "Catalog:".bold(), report.source);
    for entity in &report.entities {
        println!("  {} {}", "•".cyan(), entity.describe());
    }
    for warning in &report.result.warnings {
        println!("  {} {}", "warning:".yellow().bold(), warning);
    }
    for error in &report.result.errors {
        println!("  {} {}", "error:".red().bold(), error);
    }
    if report.is_valid() {
        println!("{}", "Catalog is valid".green().bold());
    } else {
        println!(
            "{}",
            format!("Catalog has {} error(s)", report.result.errors.len())
                .red()
                .bold()
        );
    }
}

fn run(cli: Cli) -> anyhow::Result<bool> {
    match cli.command {
        Command::Check { schema } => {
            let report = check_catalog(schema.as_deref())?;
            print_report(&report);
            Ok(report.is_valid())
        }
        Command::Routes { schema } => {
            for route in route_surface(schema.as_deref())? {
                println!("{}", route);
            }
            Ok(true)
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("{} {:#}", "error:".red().bold(), err);
            ExitCode::from(2)
        }
    }
}
