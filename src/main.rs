use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use event_scrape::models::Envelope;
use event_scrape::scraping::{self, diagnostics::TracingDiagnostics, fetch::HttpFetcher};
use event_scrape::server::{build_router, AppState};
use event_scrape::Config;

#[derive(Parser)]
#[command(name = "event-scrape", about = "Event listing scraper and JSON API")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the read API (default)
    Serve,
    /// List registered sites
    Sites,
    /// Scrape one site and print the response envelope
    Scrape {
        /// Site id, see `sites`
        site: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::from_env().context("Failed to load configuration")?;
    let fetcher = HttpFetcher::new(config.fetch_timeout, config.user_agent.as_deref())
        .context("Failed to build http client")?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(config, fetcher).await,
        Commands::Sites => {
            let sites = scraping::list_sites();
            println!("{}", serde_json::to_string_pretty(&Envelope::success(sites))?);
            Ok(())
        }
        Commands::Scrape { site } => {
            let events = scraping::run_single(&site, &fetcher, &TracingDiagnostics, config.retry)
                .await
                .with_context(|| format!("scrape of {site} failed"))?;
            println!("{}", serde_json::to_string_pretty(&Envelope::success(events))?);
            Ok(())
        }
    }
}

async fn serve(config: Config, fetcher: HttpFetcher) -> Result<()> {
    let state = AppState {
        fetcher: Arc::new(fetcher),
        diagnostics: Arc::new(TracingDiagnostics),
        retry: config.retry,
        sites: Arc::new(scraping::active_sites()),
    };
    for site in state.sites.iter() {
        tracing::info!(site = site.id, "GET /api/standalone/{}", site.route);
    }

    let addr = config.bind_addr();
    tracing::info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;

    axum::serve(listener, build_router(state))
        .await
        .context("Server error")?;
    Ok(())
}
