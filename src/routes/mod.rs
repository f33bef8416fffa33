pub mod progress;
pub mod rides;

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .nest("/rides", rides::router())
        .nest("/progress", progress::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::{net::SocketAddr, path::PathBuf, sync::Arc};

    use axum::{
        body::{to_bytes, Body},
        http::{Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::{
        config::{AppConfig, StorageBackend},
        services::storage::MemoryStorage,
    };

    async fn app() -> Router {
        let config = AppConfig {
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            data_root: PathBuf::from("unused"),
            storage_backend: StorageBackend::Memory,
        };
        create_router(AppState::new(config, Arc::new(MemoryStorage::new())).await)
    }

    fn ride(id: &str, timestamp: &str) -> Value {
        json!({
            "id": id,
            "pickup": "MG Road",
            "dropoff": "Indiranagar",
            "passenger": {"name": "Asha", "image": "/avatars/asha.png", "rating": 4.8, "trips": 120},
            "distance": "4.2 km",
            "duration": "14 min",
            "fare": 180.0,
            "timestamp": timestamp
        })
    }

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(value) => {
                builder = builder.header("content-type", "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };
        let response = app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    #[tokio::test]
    async fn add_list_and_remove_over_http() {
        let app = app().await;

        let (status, created) = send(
            &app,
            Method::POST,
            "/rides",
            Some(ride("A", "2024-01-01T00:00:00.000Z")),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["timestamp"], "2024-01-01T00:00:00Z");

        send(&app, Method::POST, "/rides", Some(ride("B", "2024-01-02"))).await;

        let (_, listed) = send(&app, Method::GET, "/rides", None).await;
        let ids: Vec<&str> = listed
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, ["B", "A"]);

        let (status, _) = send(&app, Method::DELETE, "/rides/A", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(&app, Method::DELETE, "/rides/missing", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (_, listed) = send(&app, Method::GET, "/rides", None).await;
        assert_eq!(listed.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn ids_with_slashes_can_be_removed() {
        let app = app().await;
        send(
            &app,
            Method::POST,
            "/rides",
            Some(ride("city/blr/42", "2024-01-01T00:00:00Z")),
        )
        .await;
        send(&app, Method::POST, "/rides", Some(ride("42", "2024-01-02T00:00:00Z"))).await;

        let (status, _) = send(&app, Method::DELETE, "/rides/city/blr/42", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (_, listed) = send(&app, Method::GET, "/rides", None).await;
        let ids: Vec<&str> = listed
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, ["42"]);
    }

    #[tokio::test]
    async fn bad_timestamp_is_a_client_error() {
        let app = app().await;
        let (status, _) = send(&app, Method::POST, "/rides", Some(ride("A", "soon"))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, listed) = send(&app, Method::GET, "/rides", None).await;
        assert_eq!(listed, json!([]));
    }

    #[tokio::test]
    async fn progress_endpoints_accumulate() {
        let app = app().await;
        send(&app, Method::POST, "/progress/coins", Some(json!({"amount": 250}))).await;
        send(&app, Method::POST, "/progress/rides", Some(json!({"amount": 1}))).await;
        let (status, progress) =
            send(&app, Method::POST, "/progress/level", Some(json!({"amount": 1}))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(progress, json!({"coins": 250, "level": 2, "totalRides": 1}));

        let (_, shown) = send(&app, Method::GET, "/progress", None).await;
        assert_eq!(shown, progress);
    }
}
