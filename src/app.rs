use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{delete, get, post},
    Router,
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/api/signals",
            get(handlers::list_signals).post(handlers::create_signal),
        )
        .route("/api/signals/:id", delete(handlers::delete_signal))
        .route("/api/dailylogs", post(handlers::create_daily_log))
        .route("/api/dailylogs/history/:signal_id", get(handlers::log_history))
        .route("/api/dailylogs/weekly-stats", get(handlers::weekly_stats))
        .route("/api/dailylogs/monthly-stats", get(handlers::monthly_stats))
        .route("/api/dailylogs/yearly-stats", get(handlers::yearly_stats))
        .with_state(state)
}
