//! Normalization of provider-native frames into canonical records.
//!
//! The transform renames the vendor's OHLCV columns to the canonical
//! schema, truncates each timestamp to a UTC calendar date (the upsert join
//! key, so truncation must be deterministic across runs), attaches the
//! batch-level trailing P/E to every row, and drops columns outside the
//! canonical set (`adj_close`). A malformed frame fails the whole batch
//! with a [`SchemaError`] before anything is written.

use chrono::DateTime;
use price_feed::models::raw_frame::RawFrame;
use thiserror::Error;

use crate::models::PriceRecord;

/// A provider frame that cannot be normalized into the canonical schema.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// A required column array was absent from the response.
    #[error("missing required column: {name}")]
    MissingColumn {
        /// Canonical name of the absent column.
        name: &'static str,
    },

    /// A column's row count disagrees with the timestamp spine.
    #[error("column {name} has {actual} rows, expected {expected}")]
    ColumnLength {
        name: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A cell holds a value the canonical schema cannot represent.
    #[error("column {name} row {row} holds an invalid value: {value}")]
    InvalidValue {
        name: &'static str,
        row: usize,
        value: String,
    },
}

fn require_column<'a, T>(
    name: &'static str,
    column: &'a Option<Vec<Option<T>>>,
    expected: usize,
) -> Result<&'a [Option<T>], SchemaError> {
    let cells = column
        .as_deref()
        .ok_or(SchemaError::MissingColumn { name })?;
    if cells.len() != expected {
        return Err(SchemaError::ColumnLength {
            name,
            expected,
            actual: cells.len(),
        });
    }
    Ok(cells)
}

/// Normalizes one fetched batch into [`PriceRecord`]s.
///
/// `pe_ratio` is a single point-in-time value and is attached identically
/// to every row of the batch.
pub fn transform(
    frame: &RawFrame,
    pe_ratio: Option<f64>,
) -> Result<Vec<PriceRecord>, SchemaError> {
    let n = frame.len();

    let open = require_column("open", &frame.open, n)?;
    let high = require_column("high", &frame.high, n)?;
    let low = require_column("low", &frame.low, n)?;
    let close = require_column("close", &frame.close, n)?;
    let volume = require_column("volume", &frame.volume, n)?;

    let mut records = Vec::with_capacity(n);
    for row in 0..n {
        let unix = frame.timestamps[row];
        let timestamp = DateTime::from_timestamp(unix, 0)
            .ok_or_else(|| SchemaError::InvalidValue {
                name: "timestamp",
                row,
                value: unix.to_string(),
            })?
            .date_naive();

        if let Some(v) = volume[row]
            && v < 0
        {
            return Err(SchemaError::InvalidValue {
                name: "volume",
                row,
                value: v.to_string(),
            });
        }

        records.push(PriceRecord {
            timestamp,
            open: open[row],
            high: high[row],
            low: low[row],
            close: close[row],
            volume: volume[row],
            pe_ratio,
        });
    }

    Ok(records)
}
