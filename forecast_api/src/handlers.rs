//! HTTP endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;

use price_sync::{models::PriceRecord, store::PriceStore};

use crate::{
    error::ApiError,
    rollout::{forecast_rollout, predict_next},
    state::AppState,
};

/// Rows pulled from the store for an orchestrated forecast.
const HISTORY_FETCH_LIMIT: i64 = 60;
/// Rows of context echoed back alongside the forecast.
const HISTORY_CONTEXT_ROWS: usize = 45;

/// Days rolled forward by the multi-step endpoints.
const ROLLOUT_STEPS: usize = 7;

#[derive(Debug, Deserialize)]
pub struct StockData {
    pub data: Vec<f64>,
}

#[derive(Debug, Deserialize)]
pub struct HistoricalQuery {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Liveness probe - GET /health
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// One-step forecast from a caller-supplied series - POST /predict_1day
pub async fn predict_1day(
    State(state): State<Arc<AppState>>,
    Json(body): Json<StockData>,
) -> Result<Json<Value>, ApiError> {
    let step = predict_next(&*state.model, &state.scaler, &body.data)?;
    Ok(Json(json!({ "1_day_predictions": [step] })))
}

/// Seven-step autoregressive forecast - POST /predict_7day
pub async fn predict_7day(
    State(state): State<Arc<AppState>>,
    Json(body): Json<StockData>,
) -> Result<Json<Value>, ApiError> {
    let steps = forecast_rollout(&*state.model, &state.scaler, &body.data, ROLLOUT_STEPS)?;
    Ok(Json(json!({ "7_day_predictions": steps })))
}

fn latest_records(state: &AppState) -> Result<Vec<PriceRecord>, ApiError> {
    let mut conn = state
        .conn
        .lock()
        .map_err(|_| ApiError::Internal("store connection poisoned".to_string()))?;
    Ok(state.store.fetch_latest(&mut conn, HISTORY_FETCH_LIMIT)?)
}

fn context_tail(records: &[PriceRecord]) -> &[PriceRecord] {
    &records[records.len().saturating_sub(HISTORY_CONTEXT_ROWS)..]
}

/// Store-backed one-day forecast - POST /forecast_1day
///
/// Pulls the most recent stored rows, feeds their closing prices to the
/// model, and returns the forecast together with recent history for
/// context.
pub async fn forecast_1day(State(state): State<Arc<AppState>>) -> Result<Json<Value>, ApiError> {
    let records = latest_records(&state)?;
    let closes: Vec<f64> = records.iter().filter_map(|r| r.close).collect();

    let step = predict_next(&*state.model, &state.scaler, &closes)?;
    info!(window = closes.len(), "served store-backed 1-day forecast");

    Ok(Json(json!({
        "historical_data": context_tail(&records),
        "forecast": [step],
    })))
}

/// Store-backed seven-day forecast - POST /forecast_7day
pub async fn forecast_7day(State(state): State<Arc<AppState>>) -> Result<Json<Value>, ApiError> {
    let records = latest_records(&state)?;
    let closes: Vec<f64> = records.iter().filter_map(|r| r.close).collect();

    let steps = forecast_rollout(&*state.model, &state.scaler, &closes, ROLLOUT_STEPS)?;
    info!(window = closes.len(), "served store-backed 7-day forecast");

    Ok(Json(json!({
        "historical_data": context_tail(&records),
        "forecast": steps,
    })))
}

/// Stored history between two dates, inclusive - GET /historical
pub async fn historical(
    State(state): State<Arc<AppState>>,
    Query(range): Query<HistoricalQuery>,
) -> Result<Json<Vec<PriceRecord>>, ApiError> {
    if range.start > range.end {
        return Err(ApiError::BadRequest(format!(
            "start {} is after end {}",
            range.start, range.end
        )));
    }

    let mut conn = state
        .conn
        .lock()
        .map_err(|_| ApiError::Internal("store connection poisoned".to_string()))?;
    let records = state.store.fetch_range(&mut conn, range.start, range.end)?;
    Ok(Json(records))
}
