//! End-to-end tests for the HTTP surface.
//!
//! Each test builds a router over a temp SQLite database and temp JSON
//! artifacts, then drives it with in-process requests. The model artifact
//! is a persistence model (all weight on the newest observation), so every
//! forecast equals the last close and assertions stay exact.

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use chrono::NaiveDate;
use forecast_api::{model::LinearModel, scaler::MinMaxScaler, server::build_router, state::AppState};
use price_sync::{
    models::PriceRecord,
    store::{PriceStore, SqliteStore},
};
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

const LOOK_BACK: usize = 21;

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
}

fn record(date: NaiveDate, close: f64) -> PriceRecord {
    PriceRecord {
        timestamp: date,
        open: Some(close - 1.0),
        high: Some(close + 2.0),
        low: Some(close - 2.0),
        close: Some(close),
        volume: Some(1_000_000),
        pe_ratio: Some(24.87),
    }
}

/// Thirty consecutive trading days with closes 101.0, 102.0, ...
fn month_of_rows() -> Vec<PriceRecord> {
    (1..=30).map(|d| record(day(d), 100.0 + d as f64)).collect()
}

fn write_artifacts(dir: &TempDir) -> (LinearModel, MinMaxScaler) {
    let mut weights = vec![0.0; LOOK_BACK];
    weights[LOOK_BACK - 1] = 1.0;

    let model_path = dir.path().join("model_1day.json");
    let artifact = json!({ "look_back": LOOK_BACK, "weights": weights, "bias": 0.0 });
    std::fs::write(&model_path, artifact.to_string()).unwrap();

    let scaler_path = dir.path().join("scaler.json");
    std::fs::write(&scaler_path, r#"{"data_min": 0.0, "data_max": 500.0}"#).unwrap();

    (
        LinearModel::load(&model_path).unwrap(),
        MinMaxScaler::load(&scaler_path).unwrap(),
    )
}

fn app_with_rows(dir: &TempDir, rows: &[PriceRecord]) -> Router {
    let db_url = dir
        .path()
        .join("prices.sqlite3")
        .to_string_lossy()
        .into_owned();
    price_sync::db::migrate::run_sqlite(&db_url).unwrap();
    let mut conn = price_sync::db::connection::connect_sqlite(&db_url).unwrap();

    if !rows.is_empty() {
        let outcome = SqliteStore::new().upsert_batch(&mut conn, rows).unwrap();
        assert!(outcome.failures.is_empty(), "test seed failed to write");
    }

    let (model, scaler) = write_artifacts(dir);
    build_router(AppState::new(model, scaler, conn))
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    read_json(response).await
}

async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    read_json(response).await
}

async fn read_json(response: axum::response::Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn health_reports_ok() {
    let dir = TempDir::new().unwrap();
    let app = app_with_rows(&dir, &[]);

    let (status, body) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn predict_1day_returns_one_prediction_for_a_full_window() {
    let dir = TempDir::new().unwrap();
    let app = app_with_rows(&dir, &[]);

    let mut series = vec![250.0; LOOK_BACK];
    *series.last_mut().unwrap() = 432.5;
    let (status, body) = post_json(&app, "/predict_1day", json!({ "data": series })).await;

    assert_eq!(status, StatusCode::OK);
    let predictions = body["1_day_predictions"].as_array().unwrap();
    assert_eq!(predictions.len(), 1);
    let step = predictions[0].as_array().unwrap();
    assert_eq!(step.len(), 1);
    assert!((step[0].as_f64().unwrap() - 432.5).abs() < 1e-9);
}

#[tokio::test]
async fn predict_1day_rejects_a_short_series_with_detail() {
    let dir = TempDir::new().unwrap();
    let app = app_with_rows(&dir, &[]);

    let (status, body) = post_json(&app, "/predict_1day", json!({ "data": vec![1.0; 20] })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let detail = body["detail"].as_str().unwrap();
    assert!(detail.contains("Need at least 21"), "detail was: {detail}");
}

#[tokio::test]
async fn predict_7day_returns_seven_steps() {
    let dir = TempDir::new().unwrap();
    let app = app_with_rows(&dir, &[]);

    let series = vec![250.0; LOOK_BACK];
    let (status, body) = post_json(&app, "/predict_7day", json!({ "data": series })).await;

    assert_eq!(status, StatusCode::OK);
    let predictions = body["7_day_predictions"].as_array().unwrap();
    assert_eq!(predictions.len(), 7);
    // A persistence model re-fed its own output stays flat.
    for step in predictions {
        let step = step.as_array().unwrap();
        assert!((step[0].as_f64().unwrap() - 250.0).abs() < 1e-9);
    }
}

#[tokio::test]
async fn forecast_1day_serves_context_and_forecast_from_the_store() {
    let dir = TempDir::new().unwrap();
    let app = app_with_rows(&dir, &month_of_rows());

    let (status, body) = post_json(&app, "/forecast_1day", Value::Null).await;

    assert_eq!(status, StatusCode::OK);
    let history = body["historical_data"].as_array().unwrap();
    assert_eq!(history.len(), 30);
    assert_eq!(history[0]["timestamp"], "2024-01-01");
    assert_eq!(history[29]["timestamp"], "2024-01-30");

    let forecast = body["forecast"].as_array().unwrap();
    assert_eq!(forecast.len(), 1);
    let step = forecast[0].as_array().unwrap();
    assert!((step[0].as_f64().unwrap() - 130.0).abs() < 1e-9);
}

#[tokio::test]
async fn forecast_context_is_capped_at_forty_five_rows() {
    let dir = TempDir::new().unwrap();
    let rows: Vec<PriceRecord> = (0..50)
        .map(|i| record(day(1) + chrono::Days::new(i), 200.0 + i as f64))
        .collect();
    let app = app_with_rows(&dir, &rows);

    let (status, body) = post_json(&app, "/forecast_7day", Value::Null).await;

    assert_eq!(status, StatusCode::OK);
    let history = body["historical_data"].as_array().unwrap();
    assert_eq!(history.len(), 45);
    // The tail keeps the newest rows.
    assert_eq!(history[44]["timestamp"], "2024-02-19");
    assert_eq!(body["forecast"].as_array().unwrap().len(), 7);
}

#[tokio::test]
async fn forecast_with_a_sparse_store_is_a_bad_request() {
    let dir = TempDir::new().unwrap();
    let rows: Vec<PriceRecord> = (1..=5).map(|d| record(day(d), 100.0)).collect();
    let app = app_with_rows(&dir, &rows);

    let (status, body) = post_json(&app, "/forecast_1day", Value::Null).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].as_str().unwrap().contains("Need at least"));
}

#[tokio::test]
async fn historical_range_is_inclusive_on_both_ends() {
    let dir = TempDir::new().unwrap();
    let app = app_with_rows(&dir, &month_of_rows());

    let (status, body) = get(&app, "/historical?start=2024-01-03&end=2024-01-07").await;

    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 5);
    assert_eq!(rows[0]["timestamp"], "2024-01-03");
    assert_eq!(rows[4]["timestamp"], "2024-01-07");
    assert!((rows[0]["close"].as_f64().unwrap() - 103.0).abs() < 1e-9);
}

#[tokio::test]
async fn historical_rejects_an_inverted_range() {
    let dir = TempDir::new().unwrap();
    let app = app_with_rows(&dir, &month_of_rows());

    let (status, body) = get(&app, "/historical?start=2024-01-07&end=2024-01-03").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].as_str().unwrap().contains("after end"));
}

#[tokio::test]
async fn historical_rejects_malformed_dates() {
    let dir = TempDir::new().unwrap();
    let app = app_with_rows(&dir, &month_of_rows());

    let (status, _) = get(&app, "/historical?start=not-a-date&end=2024-01-03").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
