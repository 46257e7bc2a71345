use anyhow::Result;
use clap::{Parser, Subcommand};
use price_feed::providers::yahoo_chart::YahooChartProvider;
use price_sync::{db, ingest, store::SqliteStore};
use shared_utils::env::{get_env_var, get_env_var_or};

#[derive(Parser)]
#[command(version, about = "Price Sync CLI")]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Run one fetch-transform-upsert pass against the configured store.
    Ingest {
        /// Provider symbol to track; falls back to TICKER_SYMBOL, then the
        /// built-in default.
        #[arg(long)]
        symbol: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match cli.cmd {
        Cmd::Ingest { symbol } => {
            let db_url = get_env_var("DATABASE_URL")?;
            db::migrate::run_sqlite(&db_url)?;
            let mut conn = db::connection::connect_sqlite(&db_url)?;

            let symbol = symbol
                .unwrap_or_else(|| get_env_var_or("TICKER_SYMBOL", ingest::DEFAULT_SYMBOL));

            let provider = YahooChartProvider::new()?;
            let store = SqliteStore::new();
            let report = ingest::run_ingestion(&provider, &mut conn, &store, &symbol).await?;

            println!("{}", report.message);
        }
    }

    Ok(())
}
