//! Provider-native columnar result of a daily-series fetch.
//!
//! A [`RawFrame`] is deliberately *not* the canonical record: columns keep
//! their provider-side meaning (unix-second timestamps, nullable cells,
//! the vendor's `adj_close` included) and normalization happens downstream.

/// One fetched batch of daily observations, column-major, as the provider
/// shipped it.
///
/// `timestamps` is the spine: every other populated column must have the
/// same length, with `None` cells where the vendor had no value for that
/// day. A column that is `None` was absent from the response entirely.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawFrame {
    /// Unix seconds (UTC) for each row.
    pub timestamps: Vec<i64>,
    pub open: Option<Vec<Option<f64>>>,
    pub high: Option<Vec<Option<f64>>>,
    pub low: Option<Vec<Option<f64>>>,
    pub close: Option<Vec<Option<f64>>>,
    /// Dividend/split adjusted close. Dropped during normalization.
    pub adj_close: Option<Vec<Option<f64>>>,
    pub volume: Option<Vec<Option<i64>>>,
}

impl RawFrame {
    /// True when the provider returned zero rows.
    ///
    /// This is a valid, non-error outcome ("no new data") and callers are
    /// expected to short-circuit on it without touching the store.
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Number of rows in the batch.
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }
}
