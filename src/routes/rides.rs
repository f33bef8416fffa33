use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};

use crate::{
    error::AppError,
    models::ride_request::{NewRideRequest, RideRequest},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_requests).post(add_request))
        // Ids are free-form and may contain slashes.
        .route("/*id", delete(remove_request))
}

async fn list_requests(State(state): State<AppState>) -> Json<Vec<RideRequest>> {
    let rides = state.rides.lock().await;
    Json(rides.pending_requests().to_vec())
}

async fn add_request(
    State(state): State<AppState>,
    Json(request): Json<NewRideRequest>,
) -> Result<(StatusCode, Json<RideRequest>), AppError> {
    let mut rides = state.rides.lock().await;
    let stored = rides.add_ride_request(request).await?;
    Ok((StatusCode::CREATED, Json(stored.clone())))
}

async fn remove_request(State(state): State<AppState>, Path(id): Path<String>) -> StatusCode {
    state.rides.lock().await.remove_ride_request(&id).await;
    StatusCode::NO_CONTENT
}
