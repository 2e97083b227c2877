use chrono::Utc;
use clap::Subcommand;
use dalil_core::AppConfig;
use dalil_store::{CacheRead, CacheStore, FileStore, CACHE_TTL_SECS};

/// Sub-commands available under `cache`.
#[derive(Debug, Subcommand)]
pub enum CacheCommands {
    /// Show whether the stored snapshot is usable
    Status,
    /// Delete the stored snapshot
    Clear,
}

pub(crate) fn run_cache(config: &AppConfig, command: &CacheCommands) {
    let store = CacheStore::new(FileStore::new(&config.cache_dir));
    match command {
        CacheCommands::Status => print_status(&store),
        CacheCommands::Clear => match store.clear() {
            Ok(()) => println!("snapshot cleared from {}", config.cache_dir.display()),
            Err(e) => tracing::error!(error = %e, "failed to clear snapshot cache"),
        },
    }
}

fn print_status(store: &CacheStore<FileStore>) {
    let now = Utc::now();
    match store.inspect(now) {
        CacheRead::Hit(snapshot) => {
            let age = snapshot.age(now);
            println!(
                "hit: {} entries captured {} ({}m old, ttl {}m)",
                snapshot.entries.len(),
                snapshot.timestamp.to_rfc3339(),
                age.num_minutes(),
                CACHE_TTL_SECS / 60
            );
        }
        CacheRead::SchemaMismatch { found } => {
            let found = found.map_or_else(|| "none".to_owned(), |v| v.to_string());
            println!("schema_mismatch: stored version {found}");
        }
        other => println!("{}", other.label()),
    }
}
