//! Read-only query surface.
//!
//! ハンドラは Store からコピーを取り出して JSON にするだけ。
//! 上流のエラーはここには現れない（snapshot が古くなるだけ）。

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use sicbo_core::{HistoryView, LatestSnapshot, PredictionView, Store};

pub fn router(store: Store) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/md5", get(latest))
        .route("/api/history", get(history))
        .route("/api/dudoan", get(prediction))
        .with_state(store)
}

async fn index() -> &'static str {
    "API server running. Endpoints: /api/md5, /api/history, /api/dudoan"
}

async fn latest(State(store): State<Store>) -> Json<LatestSnapshot> {
    Json(store.latest().await)
}

async fn history(State(store): State<Store>) -> Json<HistoryView> {
    Json(store.history_view().await)
}

async fn prediction(State(store): State<Store>) -> Json<PredictionView> {
    Json(store.prediction_view().await)
}
