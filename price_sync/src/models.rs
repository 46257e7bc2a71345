//! Canonical persisted record for one trading day.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One trading day's observation in the canonical schema.
///
/// `timestamp` is the unique key within the store. Every other field may be
/// `None` only when the source data was missing for that day. `pe_ratio` is
/// a cross-sectional value attached uniformly to a whole fetched batch at
/// fetch time, not a per-day fundamental.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    /// Calendar date of the observation (UTC, no time-of-day component).
    pub timestamp: NaiveDate,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    /// Shares traded; never negative.
    pub volume: Option<i64>,
    /// Trailing P/E at the time the batch was fetched.
    pub pe_ratio: Option<f64>,
}
