//! Router tests for the scoring endpoints

use std::sync::Arc;

use anomaly_core::{model::ForestParams, train, Scorer, TrainingParams, TrainingRow};
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::handlers::health::HealthResponse;
use crate::models::PredictResponse;
use crate::{create_router, AppState};

fn test_scorer() -> Scorer {
    let rows: Vec<TrainingRow> = (0..80)
        .map(|i| TrainingRow {
            event_id: i,
            hour_of_day: Some((7 + i % 12) as f64),
            minutes_since_prev: Some((20 + (i * 13) % 90) as f64),
            geo_km_from_prev: Some((i % 25) as f64),
            failed_15m: Some((i % 2) as f64),
            is_night: Some(0.0),
        })
        .collect();
    let params = TrainingParams {
        forest: ForestParams { n_estimators: 30, ..Default::default() },
        ..Default::default()
    };

    Scorer::new(train(&rows, &params).unwrap()).unwrap()
}

fn app() -> Router {
    create_router(AppState {
        scorer: Arc::new(test_scorer()),
    })
}

async fn post_json(app: Router, uri: &str, body: String) -> (StatusCode, Vec<u8>) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}

#[tokio::test]
async fn test_predict_preserves_order() {
    let body = json!({
        "items": [
            {"event_id": 3, "hour_of_day": 9, "minutes_since_prev": 40.0, "geo_km_from_prev": 2.0, "failed_15m": 0, "is_night": 0},
            {"event_id": 1, "hour_of_day": 3, "minutes_since_prev": 1.0, "geo_km_from_prev": 9000.0, "failed_15m": 6, "is_night": 1},
            {"event_id": 2, "hour_of_day": 14, "is_night": 0}
        ]
    });

    let (status, bytes) = post_json(app(), "/predict", body.to_string()).await;
    assert_eq!(status, StatusCode::OK);

    let response: PredictResponse = serde_json::from_slice(&bytes).unwrap();
    let ids: Vec<i64> = response.results.iter().map(|r| r.event_id).collect();
    assert_eq!(ids, vec![3, 1, 2]);

    for result in &response.results {
        assert_eq!(result.model_version, "if_v1");
        assert_eq!(result.predicted, u8::from(result.score >= result.threshold));
    }
}

#[tokio::test]
async fn test_predict_response_shape() {
    let body = json!({"items": [{"event_id": 10, "hour_of_day": 12, "is_night": 0}]});

    let (status, bytes) = post_json(app(), "/predict", body.to_string()).await;
    assert_eq!(status, StatusCode::OK);

    let value: Value = serde_json::from_slice(&bytes).unwrap();
    let result = &value["results"][0];
    for field in ["event_id", "model_version", "score", "threshold", "predicted"] {
        assert!(result.get(field).is_some(), "missing {}", field);
    }
}

#[tokio::test]
async fn test_null_fields_match_zeros() {
    let sparse = json!({"items": [{"event_id": 1, "hour_of_day": 22, "minutes_since_prev": null, "geo_km_from_prev": null, "failed_15m": null, "is_night": 1}]});
    let zeros = json!({"items": [{"event_id": 1, "hour_of_day": 22, "minutes_since_prev": 0.0, "geo_km_from_prev": 0.0, "failed_15m": 0, "is_night": 1}]});

    let (_, a) = post_json(app(), "/predict", sparse.to_string()).await;
    let (_, b) = post_json(app(), "/predict", zeros.to_string()).await;

    assert_eq!(a, b);
}

#[tokio::test]
async fn test_empty_batch_rejected() {
    let (status, bytes) = post_json(app(), "/predict", json!({"items": []}).to_string()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let value: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(value["status"], 400);
}

#[tokio::test]
async fn test_malformed_item_fails_whole_batch() {
    let body = json!({
        "items": [
            {"event_id": 1, "hour_of_day": 9, "is_night": 0},
            {"event_id": "two", "hour_of_day": 9, "is_night": 0}
        ]
    });

    let (status, _) = post_json(app(), "/predict", body.to_string()).await;
    assert!(status.is_client_error());
}

#[tokio::test]
async fn test_health_reports_model() {
    let response = app()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let health: HealthResponse = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(health.status, "healthy");
    assert_eq!(health.model_version, "if_v1");
    assert!(health.threshold > 0.0);
}
