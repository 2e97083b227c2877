mod cache;
mod lang;
mod render;
mod search;

use clap::{Parser, Subcommand};
use dalil_core::{AppConfig, Coordinates, SortMode};
use tracing_subscriber::EnvFilter;

use crate::cache::CacheCommands;
use crate::lang::LangCommands;

#[derive(Debug, Parser)]
#[command(name = "dalil")]
#[command(about = "Search a local business directory from the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Search the directory
    Search {
        /// Free-text query; every word must match
        query: Option<String>,
        /// Restrict results to one category (exact match)
        #[arg(long)]
        category: Option<String>,
        /// Your position as `LAT,LNG`, enables distances
        #[arg(long, value_parser = parse_near, allow_hyphen_values = true)]
        near: Option<Coordinates>,
        /// Result order
        #[arg(long, value_enum, default_value_t = SortArg::Original)]
        sort: SortArg,
        /// Fetch even if the cached snapshot is fresh
        #[arg(long)]
        refresh: bool,
    },
    /// List the categories present in the directory
    Categories {
        /// Fetch even if the cached snapshot is fresh
        #[arg(long)]
        refresh: bool,
    },
    /// Inspect or clear the local snapshot cache
    Cache {
        #[command(subcommand)]
        command: CacheCommands,
    },
    /// Show or change the display language
    Lang {
        #[command(subcommand)]
        command: LangCommands,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum SortArg {
    Original,
    Distance,
}

impl From<SortArg> for SortMode {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Original => SortMode::Original,
            SortArg::Distance => SortMode::Distance,
        }
    }
}

fn parse_near(s: &str) -> Result<Coordinates, String> {
    Coordinates::parse_pair(s).ok_or_else(|| {
        format!("expected LAT,LNG with lat in [-90, 90] and lng in [-180, 180], got '{s}'")
    })
}

fn init_tracing(config: &AppConfig) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = dalil_core::load_app_config()?;
    init_tracing(&config)?;
    tracing::debug!(?config, "configuration loaded");

    match cli.command {
        Commands::Search {
            query,
            category,
            near,
            sort,
            refresh,
        } => {
            let request = search::SearchRequest {
                query: query.unwrap_or_default(),
                category,
                near,
                sort: sort.into(),
                refresh,
            };
            search::run_search(&config, request).await
        }
        Commands::Categories { refresh } => search::run_categories(&config, refresh).await,
        Commands::Cache { command } => {
            cache::run_cache(&config, &command);
            Ok(())
        }
        Commands::Lang { command } => {
            lang::run_lang(&config, &command);
            Ok(())
        }
    }
}
