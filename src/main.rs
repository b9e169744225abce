use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{ConfigCommand, RecipeCommand, SearchCommand};
use recipebox::config::Config;
use recipebox::db::{init_db, RecipeRepository, SearchIndex};

#[derive(Parser)]
#[command(name = "recipebox")]
#[command(version)]
#[command(about = "Manage drink and food recipes", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage recipes
    Recipe(RecipeCommand),

    /// Search recipes by name, ingredient or step
    Search(SearchCommand),

    /// Manage configuration
    Config(ConfigCommand),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config)?;

    match cli.command {
        Some(Commands::Recipe(cmd)) => {
            let pool = init_db(&config.database_path.value).await?;
            let repo = RecipeRepository::new(pool);
            cmd.run(&repo).await?;
        }
        Some(Commands::Search(cmd)) => {
            let pool = init_db(&config.database_path.value).await?;
            let index = SearchIndex::new(pool);
            cmd.run(&index).await?;
        }
        Some(Commands::Config(cmd)) => {
            cmd.run(&config)?;
        }
        None => {
            println!("Use --help to see available commands");
        }
    }

    Ok(())
}
