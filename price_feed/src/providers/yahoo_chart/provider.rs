use async_trait::async_trait;
use chrono::{Duration, NaiveDate};
use reqwest::{Client, header};
use tracing::debug;

use crate::{
    models::{raw_frame::RawFrame, request_params::SeriesRequestParams},
    providers::{
        MarketDataProvider, ProviderError,
        yahoo_chart::response::{ChartEnvelope, QuoteSummaryEnvelope},
    },
};

const CHART_BASE_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";
const QUOTE_SUMMARY_BASE_URL: &str = "https://query1.finance.yahoo.com/v10/finance/quoteSummary";

// Yahoo rejects requests without a browser-ish user agent.
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) price-feed/0.1";

pub struct YahooChartProvider {
    client: Client,
}

impl YahooChartProvider {
    /// Creates a new Yahoo chart provider with a shared HTTP client.
    pub fn new() -> Result<Self, ProviderError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(header::USER_AGENT, header::HeaderValue::from_static(USER_AGENT));

        let client = Client::builder().default_headers(headers).build()?;
        Ok(Self { client })
    }

    fn unix_midnight(date: NaiveDate) -> i64 {
        date.and_time(chrono::NaiveTime::MIN).and_utc().timestamp()
    }
}

#[async_trait]
impl MarketDataProvider for YahooChartProvider {
    async fn fetch_daily_series(
        &self,
        params: SeriesRequestParams,
    ) -> Result<RawFrame, ProviderError> {
        if params.start > params.end {
            return Err(ProviderError::Validation(format!(
                "start date {} is after end date {}",
                params.start, params.end
            )));
        }

        // The chart API treats period2 as exclusive; push it one day past the
        // inclusive end so the final trading day is included.
        let period1 = Self::unix_midnight(params.start);
        let period2 = Self::unix_midnight(params.end + Duration::days(1));

        let url = format!("{CHART_BASE_URL}/{}", params.symbol);
        debug!(symbol = %params.symbol, %params.start, %params.end, "fetching daily series");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("period1", period1.to_string()),
                ("period2", period2.to_string()),
                ("interval", "1d".to_string()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let error_msg = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown API error".to_string());
            return Err(ProviderError::Api(error_msg));
        }

        let envelope = response.json::<ChartEnvelope>().await?;

        if let Some(err) = envelope.chart.error {
            return Err(ProviderError::Api(format!("{}: {}", err.code, err.description)));
        }

        let frame = envelope
            .chart
            .result
            .and_then(|results| results.into_iter().next())
            .map(RawFrame::from)
            .unwrap_or_default();

        Ok(frame)
    }

    async fn fetch_trailing_pe(&self, symbol: &str) -> Result<Option<f64>, ProviderError> {
        let url = format!("{QUOTE_SUMMARY_BASE_URL}/{symbol}");
        debug!(%symbol, "fetching trailing P/E");

        let response = self
            .client
            .get(&url)
            .query(&[("modules", "summaryDetail")])
            .send()
            .await?;

        if !response.status().is_success() {
            let error_msg = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown API error".to_string());
            return Err(ProviderError::Api(error_msg));
        }

        let envelope = response.json::<QuoteSummaryEnvelope>().await?;

        if let Some(err) = envelope.quote_summary.error {
            return Err(ProviderError::Api(format!("{}: {}", err.code, err.description)));
        }

        // A symbol without a published trailing P/E is a normal outcome.
        let pe = envelope
            .quote_summary
            .result
            .and_then(|mut results| results.pop())
            .and_then(|result| result.summary_detail)
            .and_then(|detail| detail.trailing_pe)
            .and_then(|value| value.raw);

        Ok(pe)
    }
}
