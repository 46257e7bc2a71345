//! Yahoo Finance chart-API provider.
//!
//! Daily OHLCV rows come from the public v8 `chart` endpoint and the
//! trailing P/E from the v10 `quoteSummary` endpoint. Neither requires an
//! API key.

mod provider;
mod response;

pub use provider::YahooChartProvider;
pub use response::{ChartEnvelope, QuoteSummaryEnvelope};
