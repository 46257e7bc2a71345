//! Provider abstraction for market data sources.
//!
//! This module defines the [`MarketDataProvider`] trait, a unified interface
//! for pulling a daily price series and a point-in-time scalar metric
//! (trailing P/E) from any market data vendor.
//!
//! Concrete implementations (such as [`yahoo_chart::YahooChartProvider`])
//! handle vendor-specific API logic and validation. The trait is async and
//! supports dynamic dispatch (`dyn MarketDataProvider`) so callers can pick
//! a provider at runtime.
//!
//! A successful fetch with zero rows is **not** an error: it comes back as
//! an empty [`RawFrame`]. Network and API failures come back as
//! [`ProviderError`] so the two outcomes are never conflated.

pub mod errors;
pub mod yahoo_chart;

use async_trait::async_trait;

pub use errors::ProviderError;

use crate::models::{raw_frame::RawFrame, request_params::SeriesRequestParams};

#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Fetches daily OHLCV rows for the requested inclusive date range.
    ///
    /// Implementations must validate `params` (`start <= end`) and return
    /// an empty frame, not an error, when the vendor simply has no rows.
    async fn fetch_daily_series(
        &self,
        params: SeriesRequestParams,
    ) -> Result<RawFrame, ProviderError>;

    /// Fetches the instrument's trailing P/E ratio.
    ///
    /// `Ok(None)` means the vendor does not publish the figure for this
    /// symbol; it is not a failure.
    async fn fetch_trailing_pe(&self, symbol: &str) -> Result<Option<f64>, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    struct EmptyProvider;

    #[async_trait]
    impl MarketDataProvider for EmptyProvider {
        async fn fetch_daily_series(
            &self,
            _params: SeriesRequestParams,
        ) -> Result<RawFrame, ProviderError> {
            Ok(RawFrame::default())
        }

        async fn fetch_trailing_pe(&self, _symbol: &str) -> Result<Option<f64>, ProviderError> {
            Ok(None)
        }
    }

    // Runtime-selected providers only work through `Box<dyn MarketDataProvider>`,
    // so keep the trait object-safe.
    fn get_provider(_name: &str) -> Box<dyn MarketDataProvider> {
        Box::new(EmptyProvider)
    }

    #[tokio::test]
    async fn trait_is_object_safe_and_empty_is_ok() {
        let provider = get_provider("empty");
        let params = SeriesRequestParams::new(
            "NIFTYBEES.NS",
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        );

        let frame = provider.fetch_daily_series(params).await.unwrap();
        assert!(frame.is_empty());

        let pe = provider.fetch_trailing_pe("NIFTYBEES.NS").await.unwrap();
        assert!(pe.is_none());
    }
}
