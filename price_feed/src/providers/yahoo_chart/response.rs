//! Wire structs for Yahoo's chart and quoteSummary payloads.

use serde::Deserialize;

use crate::models::raw_frame::RawFrame;

#[derive(Deserialize, Debug)]
pub struct ChartEnvelope {
    pub chart: Chart,
}

#[derive(Deserialize, Debug)]
pub struct Chart {
    pub result: Option<Vec<ChartResult>>,
    pub error: Option<ApiErrorBody>,
}

#[derive(Deserialize, Debug)]
pub struct ApiErrorBody {
    pub code: String,
    pub description: String,
}

#[derive(Deserialize, Debug)]
pub struct ChartResult {
    /// Unix seconds per row. Absent when the range contains no trading days.
    #[serde(default)]
    pub timestamp: Vec<i64>,
    #[serde(default)]
    pub indicators: Indicators,
}

#[derive(Deserialize, Debug, Default)]
pub struct Indicators {
    #[serde(default)]
    pub quote: Vec<QuoteBlock>,
    pub adjclose: Option<Vec<AdjCloseBlock>>,
}

#[derive(Deserialize, Debug, Default)]
pub struct QuoteBlock {
    pub open: Option<Vec<Option<f64>>>,
    pub high: Option<Vec<Option<f64>>>,
    pub low: Option<Vec<Option<f64>>>,
    pub close: Option<Vec<Option<f64>>>,
    pub volume: Option<Vec<Option<i64>>>,
}

#[derive(Deserialize, Debug)]
pub struct AdjCloseBlock {
    pub adjclose: Option<Vec<Option<f64>>>,
}

impl From<ChartResult> for RawFrame {
    /// Re-shapes one chart result into the provider-native frame.
    ///
    /// Columns the payload omitted stay `None`; validation of their
    /// presence and lengths is the normalizer's job, not ours.
    fn from(result: ChartResult) -> Self {
        let ChartResult {
            timestamp,
            indicators,
        } = result;

        let quote = indicators.quote.into_iter().next().unwrap_or_default();
        let adj_close = indicators
            .adjclose
            .and_then(|blocks| blocks.into_iter().next())
            .and_then(|block| block.adjclose);

        RawFrame {
            timestamps: timestamp,
            open: quote.open,
            high: quote.high,
            low: quote.low,
            close: quote.close,
            adj_close,
            volume: quote.volume,
        }
    }
}

#[derive(Deserialize, Debug)]
pub struct QuoteSummaryEnvelope {
    #[serde(rename = "quoteSummary")]
    pub quote_summary: QuoteSummary,
}

#[derive(Deserialize, Debug)]
pub struct QuoteSummary {
    pub result: Option<Vec<SummaryResult>>,
    pub error: Option<ApiErrorBody>,
}

#[derive(Deserialize, Debug)]
pub struct SummaryResult {
    #[serde(rename = "summaryDetail")]
    pub summary_detail: Option<SummaryDetail>,
}

#[derive(Deserialize, Debug)]
pub struct SummaryDetail {
    #[serde(rename = "trailingPE")]
    pub trailing_pe: Option<FormattedValue>,
}

/// Yahoo wraps numeric fields as `{ "raw": 24.5, "fmt": "24.50" }`.
#[derive(Deserialize, Debug)]
pub struct FormattedValue {
    pub raw: Option<f64>,
}
