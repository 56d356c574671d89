//! Outclass CLI
//!
//! Keeps a collection of cards and records which cards strictly outclass
//! which, so you always know the best card in every chain.

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod error;

#[derive(Parser)]
#[command(name = "outclass")]
#[command(author = "Outclass Contributors")]
#[command(version)]
#[command(about = "Track which cards in your collection outclass which", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Workspace directory (defaults to current directory)
    #[arg(short = 'C', long = "dir", global = true, default_value = ".")]
    dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize Outclass in the workspace directory
    Init,

    /// Register a card by identifier
    Add {
        /// Card identifier
        id: String,

        /// Display name (defaults to the identifier)
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Find a card by name in the configured catalog
    Lookup {
        /// Card name
        name: String,

        /// Register the card found
        #[arg(long)]
        add: bool,
    },

    /// Declare that one card is strictly better than another
    Upgrade {
        /// The outclassed card (identifier or name)
        worse: String,

        /// The better card (identifier or name)
        better: String,
    },

    /// Retract a declared upgrade
    Unlink {
        /// The outclassed card
        worse: String,

        /// The better card
        better: String,
    },

    /// Remove a card and its upgrades
    Remove {
        /// Card identifier or name
        card: String,
    },

    /// Show a card's upgrades and downgrades
    Show {
        /// Card identifier or name
        card: String,
    },

    /// Compare two cards
    Compare { a: String, b: String },

    /// List registered cards
    List {
        /// Only cards nothing outclasses
        #[arg(long)]
        best: bool,

        /// Only cards without any upgrade or downgrade
        #[arg(long)]
        orphaned: bool,
    },

    /// Export the collection to JSON
    Export {
        /// Output file
        #[arg(short, long, default_value = "outclass-cards.json")]
        output: PathBuf,
    },

    /// Merge a JSON export into the collection
    Import {
        /// File to import
        file: PathBuf,
    },

    /// Show collection statistics
    Status,
}

fn main() {
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(tracing_subscriber::EnvFilter::new(filter))
        .init();

    let dir = cli.dir.as_path();
    let result = match cli.command {
        Commands::Init => commands::init(dir),
        Commands::Add { id, name } => commands::add(dir, &id, name.as_deref()),
        Commands::Lookup { name, add } => commands::lookup(dir, &name, add),
        Commands::Upgrade { worse, better } => commands::upgrade(dir, &worse, &better),
        Commands::Unlink { worse, better } => commands::unlink(dir, &worse, &better),
        Commands::Remove { card } => commands::remove(dir, &card),
        Commands::Show { card } => commands::show(dir, &card),
        Commands::Compare { a, b } => commands::compare(dir, &a, &b),
        Commands::List { best, orphaned } => commands::list(dir, best, orphaned),
        Commands::Export { output } => commands::export(dir, &output),
        Commands::Import { file } => commands::import(dir, &file),
        Commands::Status => commands::status(dir),
    };

    if let Err(e) = result {
        eprintln!("{} {}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}
