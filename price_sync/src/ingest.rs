//! Watermark-driven ingestion pass.
//!
//! One run resumes from the store's watermark, fetches the missing range
//! from the provider, normalizes it, and upserts the batch. The watermark
//! resume is **exclusive**: the next fetch starts at the day after the
//! latest stored timestamp, so a fully ingested day is never re-requested.
//! Accidental overlap stays harmless because the upsert is keyed and
//! idempotent.
//!
//! The fetch range ends at today (UTC). A run during an open trading
//! session stores the in-progress bar, and the exclusive resume will not
//! revisit that day, so the partial bar stands as final. Acceptable for a
//! daily scheduled run after market close; an intraday rerun can still
//! correct the row by backfilling the same date through the keyed upsert.

use chrono::{Days, NaiveDate, Utc};
use diesel::SqliteConnection;
use price_feed::{
    models::request_params::SeriesRequestParams,
    providers::{MarketDataProvider, ProviderError},
};
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    store::{PriceStore, RecordFailure},
    transform::{SchemaError, transform},
};

/// Instrument tracked by default.
pub const DEFAULT_SYMBOL: &str = "NIFTYBEES.NS";

/// First date ever fetched for the tracked instrument, used when the store
/// is empty.
pub const DEFAULT_START_DATE: NaiveDate = match NaiveDate::from_ymd_opt(2014, 5, 26) {
    Some(date) => date,
    None => panic!("default start date is valid"),
};

/// Failure of an ingestion pass.
///
/// Provider failure is deliberately distinct from "provider returned zero
/// rows"; the latter is a successful [`IngestReport`] with no writes.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("provider fetch failed: {0}")]
    Provider(#[from] ProviderError),

    #[error("malformed provider data: {0}")]
    Schema(#[from] SchemaError),

    #[error("store operation failed: {0}")]
    Store(#[from] anyhow::Error),
}

/// Summary of one ingestion pass.
#[derive(Debug, Serialize)]
pub struct IngestReport {
    /// Human-readable summary of what the pass did.
    pub message: String,
    /// Records successfully written.
    pub written: usize,
    /// Records the store refused, in batch order.
    #[serde(skip)]
    pub failures: Vec<RecordFailure>,
}

impl IngestReport {
    fn no_new_data() -> Self {
        Self {
            message: "No new data to insert.".to_string(),
            written: 0,
            failures: Vec::new(),
        }
    }
}

/// Determines where the next fetch should start.
///
/// Non-empty store: strictly after the latest stored date (exclusive
/// resume). Empty store: [`DEFAULT_START_DATE`].
pub fn next_start_date(
    conn: &mut SqliteConnection,
    store: &dyn PriceStore,
) -> anyhow::Result<NaiveDate> {
    let start = match store.latest_timestamp(conn)? {
        Some(latest) => latest
            .checked_add_days(Days::new(1))
            .ok_or_else(|| anyhow::anyhow!("watermark overflow past {latest}"))?,
        None => DEFAULT_START_DATE,
    };
    Ok(start)
}

/// Runs one fetch-transform-upsert pass for `symbol`.
///
/// Returns a report whose `message` matches the external contract: either
/// the processed date range or `"No new data to insert."`. The trailing P/E
/// is fetched once per pass and attached to every row of the batch.
pub async fn run_ingestion(
    provider: &dyn MarketDataProvider,
    conn: &mut SqliteConnection,
    store: &dyn PriceStore,
    symbol: &str,
) -> Result<IngestReport, IngestError> {
    let start = next_start_date(conn, store)?;
    let end = Utc::now().date_naive();

    if start > end {
        info!(%symbol, %start, "store already current; nothing to fetch");
        return Ok(IngestReport::no_new_data());
    }

    let frame = provider
        .fetch_daily_series(SeriesRequestParams::new(symbol, start, end))
        .await?;

    if frame.is_empty() {
        info!(%symbol, %start, %end, "provider returned zero rows");
        return Ok(IngestReport::no_new_data());
    }

    let pe_ratio = provider.fetch_trailing_pe(symbol).await?;
    let records = transform(&frame, pe_ratio)?;
    let outcome = store.upsert_batch(conn, &records)?;

    let message = if outcome.failures.is_empty() {
        format!("Data from {start} to {end} collected and stored successfully.")
    } else {
        warn!(
            failed = outcome.failures.len(),
            written = outcome.written,
            "batch upsert wrote fewer records than fetched"
        );
        format!(
            "Data from {start} to {end} collected; {} of {} records failed to store.",
            outcome.failures.len(),
            records.len()
        )
    };

    info!(%symbol, written = outcome.written, "ingestion pass finished");

    Ok(IngestReport {
        message,
        written: outcome.written,
        failures: outcome.failures,
    })
}
