//! Vista CLI
//!
//! Command-line interface for the vista read API

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use vista_core::logging_facility::{init, Profile};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "vista")]
#[command(about = "Vista - field-selecting read API over SQLite", long_about = None)]
struct Cli {
    /// SQLite database file
    #[arg(long, global = true, default_value = "vista.db")]
    db: PathBuf,

    /// Log output: dev (human readable) or json
    #[arg(long, global = true, default_value = "dev")]
    log_format: Profile,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Create or upgrade the database schema
    Migrate,
    /// Import a YAML or JSON fixture
    Seed(commands::seed::SeedArgs),
    /// Run one request through an endpoint and print the response body
    Query(commands::query::QueryArgs),
    /// Serve the endpoints over HTTP
    Serve(commands::serve::ServeArgs),
}

fn main() {
    let cli = Cli::parse();
    init(cli.log_format);

    let result = match cli.command {
        Commands::Migrate => commands::migrate::execute(&cli.db),
        Commands::Seed(args) => commands::seed::execute(&cli.db, args),
        Commands::Query(args) => commands::query::execute(&cli.db, args),
        Commands::Serve(args) => commands::serve::execute(&cli.db, args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
