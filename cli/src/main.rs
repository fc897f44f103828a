//! Command-line client for the EduMate study material API.
//!
//! Commands:
//! - generate: Generate notes, MCQs, and flashcards for a topic
//! - health: Check that the server is up
//!
//! Configuration via environment:
//! - EDUMATE_URL: Base URL of the server (default: http://localhost:8000)

mod commands;

use clap::{Parser, Subcommand};

use commands::{generate::GenerateArgs, health::HealthArgs};

/// EduMate CLI
///
/// Prints JSON by default; pass --human for a formatted study sheet.
#[derive(Parser)]
#[command(name = "edumate")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Output human-readable formatted text instead of JSON
    #[arg(long, global = true)]
    human: bool,

    /// EduMate server URL
    #[arg(
        long,
        env = "EDUMATE_URL",
        default_value = "http://localhost:8000",
        global = true
    )]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate study material for a topic
    Generate(GenerateArgs),

    /// Check server health
    Health(HealthArgs),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let url = cli.url.trim_end_matches('/');

    let result = match cli.command {
        Commands::Generate(args) => commands::generate::execute(&client, url, cli.human, args).await,
        Commands::Health(args) => commands::health::execute(&client, url, cli.human, args).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
