pub mod commands;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "bazaar",
    about = "Bazaar shopping search CLI",
    long_about = "Run single-shot product searches, inspect configuration, and check readiness.",
    after_help = "Examples:\n  bazaar search لپ‌تاپ با ارسال رایگان\n  bazaar doctor --json\n  bazaar config"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Run one prompt through the search pipeline and print the JSON result")]
    Search {
        #[arg(required = true, num_args = 1.., help = "Shopping request in natural language")]
        prompt: Vec<String>,
    },
    #[command(
        about = "Inspect effective configuration values with source attribution and redaction"
    )]
    Config,
    #[command(about = "Validate config, credentials, and client construction")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
}

pub fn run() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Search { prompt } => commands::search::run(&prompt.join(" ")),
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
        Command::Doctor { json } => commands::doctor::run(json),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
