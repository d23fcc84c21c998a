//! CLI binary for potluck.

use clap::{Parser, Subcommand};
use potluck::{PotluckConfig, RecipeService};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Potluck: recipe search across several upstream sources.
#[derive(Parser)]
#[command(name = "potluck", version, about)]
struct Cli {
    /// Path to TOML configuration file.
    /// Defaults to `~/.config/potluck/config.toml` when that file exists.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Command,
}

/// Available commands.
#[derive(Subcommand)]
enum Command {
    /// Search every source for recipes and print the merged result as JSON.
    Search {
        /// Query term, used verbatim.
        query: String,

        /// Resolve this many times; later runs are served from the cache.
        #[arg(long, default_value_t = 1)]
        repeat: u32,

        /// Ignore any cached result for the query.
        #[arg(long)]
        refresh: bool,
    },

    /// Fetch one quote from each advice service.
    Advice,

    /// Print the effective configuration as TOML.
    ShowConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;

    // RUST_LOG wins over the configured filter.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_filter())),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Search {
            query,
            repeat,
            refresh,
        } => run_search(&config, &query, repeat, refresh).await,
        Command::Advice => run_advice(&config).await,
        Command::ShowConfig => {
            print!("{}", config.to_toml()?);
            Ok(())
        }
    }
}

fn load_config(explicit: Option<&std::path::Path>) -> anyhow::Result<PotluckConfig> {
    if let Some(path) = explicit {
        return Ok(PotluckConfig::from_file(path)?);
    }
    let default_path = PotluckConfig::default_config_path();
    if default_path.exists() {
        Ok(PotluckConfig::from_file(&default_path)?)
    } else {
        Ok(PotluckConfig::default())
    }
}

async fn run_search(
    config: &PotluckConfig,
    query: &str,
    repeat: u32,
    refresh: bool,
) -> anyhow::Result<()> {
    let service = RecipeService::from_config(config)?;

    let mut recipes = if refresh {
        service.refresh_recipes(query).await?
    } else {
        service.search_recipes(query).await?
    };

    for run in 1..repeat {
        let started = std::time::Instant::now();
        recipes = service.search_recipes(query).await?;
        info!(
            run = run + 1,
            elapsed_us = started.elapsed().as_micros() as u64,
            "repeat search"
        );
    }

    println!("{}", serde_json::to_string_pretty(&recipes)?);
    Ok(())
}

async fn run_advice(config: &PotluckConfig) -> anyhow::Result<()> {
    let service = RecipeService::from_config(config)?;
    let advice = service.advice().await?;
    println!("{}", serde_json::to_string_pretty(&advice)?);
    Ok(())
}
