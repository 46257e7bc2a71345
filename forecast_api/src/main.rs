use anyhow::Context;
use forecast_api::{model::LinearModel, scaler::MinMaxScaler, server, state::AppState};
use shared_utils::env::{get_env_var, get_env_var_or};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let db_url = get_env_var("DATABASE_URL")?;
    let model_path = get_env_var_or("MODEL_PATH", "artifacts/model_1day.json");
    let scaler_path = get_env_var_or("SCALER_PATH", "artifacts/scaler.json");
    let bind_addr = get_env_var_or("BIND_ADDR", "127.0.0.1:8001");

    // Artifact loading is fatal: a service that cannot forecast refuses to
    // start instead of failing lazily per request.
    let model = LinearModel::load(&model_path)
        .with_context(|| format!("loading model artifact from {model_path}"))?;
    let scaler = MinMaxScaler::load(&scaler_path)
        .with_context(|| format!("loading scaler artifact from {scaler_path}"))?;

    price_sync::db::migrate::run_sqlite(&db_url)?;
    let conn = price_sync::db::connection::connect_sqlite(&db_url)?;

    let state = AppState::new(model, scaler, conn);
    server::serve(&bind_addr, state).await
}
