//! Tasnif - Store Category Suggestion Service
//!
//! Serves the taxonomy CRUD + suggestion API, or runs a single query
//! from the command line with `--suggest`.

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tasnif::api::{self, AppState};
use tasnif::config::Config;
use tasnif::core::matcher::match_categories;
use tasnif::i18n;
use tasnif::store::{CategoryStore, FileStore, RemoteStore};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Port to listen on (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Data directory holding categories.json (overrides config)
    #[arg(short, long)]
    data_dir: Option<String>,

    /// Shared secret for mutating calls (overrides config)
    #[arg(long)]
    token: Option<String>,

    /// Run a single query against the taxonomy and exit
    #[arg(short, long)]
    suggest: Option<String>,

    /// Maximum number of suggestions to return
    #[arg(short, long)]
    limit: Option<usize>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Setup logging
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("🏷️ Tasnif v{} starting...", env!("CARGO_PKG_VERSION"));

    let mut config = Config::load()?;
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(data_dir) = args.data_dir {
        config.data_dir = data_dir;
    }
    if let Some(token) = args.token {
        config.api_token = token;
    }

    i18n::init(Some(&config.ui_language));

    let store: Arc<dyn CategoryStore> = if config.remote_base.is_empty() {
        info!("📁 Using category data in '{}'", config.data_dir);
        Arc::new(FileStore::new(&config.data_dir))
    } else {
        info!("🔁 Proxying store operations to {}", config.remote_base);
        Arc::new(RemoteStore::new(&config.remote_base, &config.remote_token))
    };

    // One-shot CLI mode
    if let Some(query) = args.suggest {
        let limit = args.limit.unwrap_or(config.suggest_limit);
        return run_suggest(store.as_ref(), &query, limit).await;
    }

    if config.api_token.is_empty() {
        info!("💡 No API token configured - mutating calls are open (dev mode)");
    }

    let state = AppState {
        store,
        api_token: config.api_token.clone(),
        suggest_limit: config.suggest_limit,
    };
    let app = api::router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("✅ Listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

/// Print ranked suggestions for one query, confidence as a percentage
async fn run_suggest(store: &dyn CategoryStore, query: &str, limit: usize) -> Result<()> {
    let categories = store.list().await?;
    let matches = match_categories(query, &categories, limit);

    if matches.is_empty() {
        println!("No matching categories for '{}'", query);
        return Ok(());
    }

    for (i, m) in matches.iter().enumerate() {
        let percent = (m.confidence * 100.0).round() as u32;
        let parent = m
            .parent_category
            .map(|p| format!(" ({})", p.name_ar))
            .unwrap_or_default();
        println!(
            "{}. [{:>3}%] {}{} - {}",
            i + 1,
            percent,
            m.category.name_ar,
            parent,
            m.matched_keywords.join(", ")
        );
    }
    Ok(())
}
