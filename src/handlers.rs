use crate::errors::AppError;
use crate::models::{
    CreateDailyLogRequest, CreateSignalRequest, DailyLog, DailyLogWithSignal, Signal,
};
use crate::state::AppState;
use crate::stats::{window_logs, StatsWindow};
use crate::store;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use tracing::info;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

pub async fn list_signals(State(state): State<AppState>) -> Json<Vec<Signal>> {
    Json(state.read(store::list_signals).await)
}

pub async fn create_signal(
    State(state): State<AppState>,
    Json(payload): Json<CreateSignalRequest>,
) -> Result<Json<Signal>, AppError> {
    let signal = state
        .write(|data| store::create_signal(data, payload, Utc::now()))
        .await?;

    info!(signal_id = signal.id, title = %signal.title, "signal created");
    Ok(Json(signal))
}

pub async fn delete_signal(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let removed_logs = state.write(|data| store::delete_signal(data, id)).await?;

    info!(signal_id = id, removed_logs, "signal deleted");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn create_daily_log(
    State(state): State<AppState>,
    Json(payload): Json<CreateDailyLogRequest>,
) -> Result<Json<DailyLog>, AppError> {
    let log = state
        .write(|data| store::create_daily_log(data, payload, Utc::now()))
        .await?;

    info!(log_id = log.id, signal_id = log.signal_id, "daily log recorded");
    Ok(Json(log))
}

pub async fn log_history(
    State(state): State<AppState>,
    Path(signal_id): Path<i64>,
) -> Json<Vec<DailyLog>> {
    Json(state.read(|data| store::log_history(data, signal_id)).await)
}

pub async fn weekly_stats(State(state): State<AppState>) -> Json<Vec<DailyLogWithSignal>> {
    stats_for(&state, StatsWindow::Weekly).await
}

pub async fn monthly_stats(State(state): State<AppState>) -> Json<Vec<DailyLogWithSignal>> {
    stats_for(&state, StatsWindow::Monthly).await
}

pub async fn yearly_stats(State(state): State<AppState>) -> Json<Vec<DailyLogWithSignal>> {
    stats_for(&state, StatsWindow::Yearly).await
}

async fn stats_for(state: &AppState, window: StatsWindow) -> Json<Vec<DailyLogWithSignal>> {
    Json(state.read(|data| window_logs(data, window)).await)
}
