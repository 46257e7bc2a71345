//! Keyed-upsert price store (SQLite).
//!
//! The store holds one row per calendar date. Writes go through
//! [`PriceStore::upsert_batch`], an insert-or-overwrite keyed on
//! `timestamp`, which makes re-fetching and backfilling safe: running the
//! same batch twice leaves the table byte-identical. Reads preserve
//! insertion (rowid) order.

use anyhow::Context;
use chrono::NaiveDate;
use diesel::prelude::*;
use tracing::warn;

use crate::{models::PriceRecord, schema::price_history};

use crate::schema::price_history::dsl as ph;

/// Result type used throughout the store for fallible operations.
pub type StoreResult<T> = anyhow::Result<T>;

/// Date keys are stored as zero-padded ISO-8601 text, so lexicographic
/// comparisons in SQL agree with chronological order.
const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

fn date_to_key(date: NaiveDate) -> String {
    date.format(DATE_KEY_FORMAT).to_string()
}

fn key_to_date(key: &str) -> StoreResult<NaiveDate> {
    NaiveDate::parse_from_str(key, DATE_KEY_FORMAT)
        .with_context(|| format!("bad date key in store: {key}"))
}

#[derive(Insertable, AsChangeset, Debug)]
#[diesel(table_name = price_history)]
#[diesel(treat_none_as_null = true)]
struct PriceRow<'a> {
    timestamp: &'a str,
    open: Option<f64>,
    high: Option<f64>,
    low: Option<f64>,
    close: Option<f64>,
    volume: Option<i64>,
    pe_ratio: Option<f64>,
}

impl<'a> PriceRow<'a> {
    fn from_record(record: &PriceRecord, key: &'a str) -> Self {
        Self {
            timestamp: key,
            open: record.open,
            high: record.high,
            low: record.low,
            close: record.close,
            volume: record.volume,
            pe_ratio: record.pe_ratio,
        }
    }
}

#[derive(Queryable, Debug)]
struct StoredRow {
    #[allow(dead_code)]
    id: Option<i32>,
    timestamp: String,
    open: Option<f64>,
    high: Option<f64>,
    low: Option<f64>,
    close: Option<f64>,
    volume: Option<i64>,
    pe_ratio: Option<f64>,
}

impl StoredRow {
    fn into_record(self) -> StoreResult<PriceRecord> {
        Ok(PriceRecord {
            timestamp: key_to_date(&self.timestamp)?,
            open: self.open,
            high: self.high,
            low: self.low,
            close: self.close,
            volume: self.volume,
            pe_ratio: self.pe_ratio,
        })
    }
}

/// One record the batch upsert could not write.
#[derive(Debug, Clone)]
pub struct RecordFailure {
    /// Date key of the failed record.
    pub timestamp: NaiveDate,
    /// Stringified database error for the caller's report.
    pub detail: String,
}

/// Outcome of a batch upsert: successes counted, failures itemized.
///
/// A partial failure never aborts the sibling writes in the same batch;
/// callers detect trouble by `written != batch.len()` and read the detail
/// from `failures`.
#[derive(Debug, Default)]
pub struct UpsertOutcome {
    /// Number of records successfully written.
    pub written: usize,
    /// Per-record failures, in batch order.
    pub failures: Vec<RecordFailure>,
}

/// Portable store surface; the SQLite implementation lives in [`SqliteStore`].
pub trait PriceStore {
    /// Returns the latest ingested date, or `None` for an empty store.
    fn latest_timestamp(&self, conn: &mut SqliteConnection) -> StoreResult<Option<NaiveDate>>;

    /// Writes each record as insert-if-absent-else-overwrite keyed by date.
    fn upsert_batch(
        &self,
        conn: &mut SqliteConnection,
        records: &[PriceRecord],
    ) -> StoreResult<UpsertOutcome>;

    /// Loads records with `start <= timestamp <= end`, in insertion order.
    fn fetch_range(
        &self,
        conn: &mut SqliteConnection,
        start: NaiveDate,
        end: NaiveDate,
    ) -> StoreResult<Vec<PriceRecord>>;

    /// Loads the most recently inserted `limit` records, returned in
    /// chronological (oldest-first) order.
    fn fetch_latest(
        &self,
        conn: &mut SqliteConnection,
        limit: i64,
    ) -> StoreResult<Vec<PriceRecord>>;
}

/// Diesel/SQLite implementation of [`PriceStore`].
pub struct SqliteStore;

impl SqliteStore {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SqliteStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PriceStore for SqliteStore {
    fn latest_timestamp(&self, conn: &mut SqliteConnection) -> StoreResult<Option<NaiveDate>> {
        let max_key: Option<String> = ph::price_history
            .select(diesel::dsl::max(ph::timestamp))
            .first(conn)
            .context("querying latest timestamp")?;

        max_key.map(|key| key_to_date(&key)).transpose()
    }

    fn upsert_batch(
        &self,
        conn: &mut SqliteConnection,
        records: &[PriceRecord],
    ) -> StoreResult<UpsertOutcome> {
        let mut outcome = UpsertOutcome::default();

        for record in records {
            let key = date_to_key(record.timestamp);
            let row = PriceRow::from_record(record, &key);

            let result = diesel::insert_into(ph::price_history)
                .values(&row)
                .on_conflict(ph::timestamp)
                .do_update()
                .set(&row)
                .execute(conn);

            match result {
                Ok(_) => outcome.written += 1,
                Err(e) => {
                    warn!(date = %key, error = %e, "record upsert failed");
                    outcome.failures.push(RecordFailure {
                        timestamp: record.timestamp,
                        detail: e.to_string(),
                    });
                }
            }
        }

        Ok(outcome)
    }

    fn fetch_range(
        &self,
        conn: &mut SqliteConnection,
        start: NaiveDate,
        end: NaiveDate,
    ) -> StoreResult<Vec<PriceRecord>> {
        let rows: Vec<StoredRow> = ph::price_history
            .filter(ph::timestamp.ge(date_to_key(start)))
            .filter(ph::timestamp.le(date_to_key(end)))
            .order(ph::id.asc())
            .load(conn)
            .context("loading price range")?;

        rows.into_iter().map(StoredRow::into_record).collect()
    }

    fn fetch_latest(
        &self,
        conn: &mut SqliteConnection,
        limit: i64,
    ) -> StoreResult<Vec<PriceRecord>> {
        let rows: Vec<StoredRow> = ph::price_history
            .order(ph::id.desc())
            .limit(limit)
            .load(conn)
            .context("loading latest records")?;

        let mut records = rows
            .into_iter()
            .map(StoredRow::into_record)
            .collect::<StoreResult<Vec<_>>>()?;
        records.reverse();
        Ok(records)
    }
}
