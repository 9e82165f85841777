#[macro_use]
extern crate log;

use std::time::Duration;

use clap::{Parser, Subcommand};
use hondana::{
    domain::{
        entities::entry::Entry,
        services::{catalogue::CatalogueService, normalizer::Normalizer},
    },
    infrastructure::{
        clock::SystemClock,
        config::Config,
        domain::repositories::{cache::CacheRepositoryImpl, provider::ProviderRepositoryImpl},
    },
};

#[derive(Parser)]
struct Opts {
    /// Path to config file
    #[clap(long)]
    config: Option<String>,
    #[clap(subcommand)]
    subcmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load the curated list from the configured titles
    Curated {
        /// Skip the cache and fetch everything again
        #[clap(long)]
        fresh: bool,
    },
    /// Load the provider-ranked catalogue
    Top {
        /// How many pages to load
        #[clap(long, default_value_t = 1)]
        pages: i64,
    },
    /// Free-text search
    Search { query: String },
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    if std::env::var("RUST_LOG").is_err() {
        if let Ok(hondana_log) = std::env::var("HONDANA_LOG") {
            std::env::set_var("RUST_LOG", format!("hondana={hondana_log}"));
        }
    }

    env_logger::init();

    if let Ok(rust_log) = std::env::var("RUST_LOG") {
        debug!("rust_log: {}", rust_log);
    }

    let opts: Opts = Opts::parse();
    let config = Config::open(opts.config)?;

    debug!("config: {:?}", config);

    let provider = ProviderRepositoryImpl::new(
        &config.provider_url,
        Duration::from_secs(config.request_timeout),
    )?;
    let cache = CacheRepositoryImpl::new(&config.cache_path, SystemClock);
    let catalogue = CatalogueService::with_config(
        provider,
        cache,
        config.catalogue(),
        Normalizer::new(),
    );

    match opts.subcmd {
        Command::Curated { fresh } => {
            let entries = catalogue.load_curated(&config.curated_titles, fresh).await?;
            print_entries(&entries);
        }
        Command::Top { pages } => {
            let mut entries = catalogue.load_ranked_page(1, false).await?;
            for _ in 1..pages {
                if !catalogue.has_next_page().await {
                    break;
                }
                entries = catalogue.load_more().await?;
            }
            print_entries(&entries);
        }
        Command::Search { query } => {
            let entries = catalogue.search(&query).await;
            print_entries(&entries);
        }
    }

    Ok(())
}

fn print_entries(entries: &[Entry]) {
    if entries.is_empty() {
        println!("no entries");
        return;
    }

    for entry in entries {
        println!(
            "{:<40} {:>4}  ch {:<4} {:<9} {}",
            entry.title,
            entry.rating,
            entry.chapter_count,
            entry.status,
            entry.genres.join(", "),
        );
    }
}
