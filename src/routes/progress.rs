use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

use crate::{models::progress::UserProgress, state::AppState};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(show_progress))
        .route("/coins", post(add_coins))
        .route("/level", post(add_level))
        .route("/rides", post(add_rides))
}

#[derive(Deserialize)]
struct Increment {
    amount: u32,
}

async fn show_progress(State(state): State<AppState>) -> Json<UserProgress> {
    Json(state.progress.lock().await.progress())
}

async fn add_coins(
    State(state): State<AppState>,
    Json(body): Json<Increment>,
) -> Json<UserProgress> {
    let mut progress = state.progress.lock().await;
    Json(progress.add_coins(u64::from(body.amount)).await)
}

async fn add_level(
    State(state): State<AppState>,
    Json(body): Json<Increment>,
) -> Json<UserProgress> {
    let mut progress = state.progress.lock().await;
    Json(progress.add_level(body.amount).await)
}

async fn add_rides(
    State(state): State<AppState>,
    Json(body): Json<Increment>,
) -> Json<UserProgress> {
    let mut progress = state.progress.lock().await;
    Json(progress.add_rides(body.amount).await)
}
