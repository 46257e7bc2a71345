use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Universal parameters for requesting a daily price series from any
/// market data provider.
///
/// This struct is vendor-agnostic; each provider translates it into its own
/// query format. **Both bounds are inclusive calendar dates**: providers
/// must return every trading day `d` with `start <= d <= end`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SeriesRequestParams {
    /// Provider-recognized instrument identifier (e.g. `"NIFTYBEES.NS"`).
    pub symbol: String,

    /// First calendar date of the requested range (inclusive).
    pub start: NaiveDate,

    /// Last calendar date of the requested range (inclusive).
    pub end: NaiveDate,
}

impl SeriesRequestParams {
    pub fn new(symbol: impl Into<String>, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            symbol: symbol.into(),
            start,
            end,
        }
    }
}
