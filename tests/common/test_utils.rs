use super::mocks::MockClassifier;
use axum::{
    Router,
    body::Body,
    http::{Request, Response},
};
use sentiment_service::{
    metrics::Metrics,
    model::SentimentModel,
    server::{self, handlers::AppState},
};
use serde_json::Value;
use std::{
    path::PathBuf,
    sync::{Arc, Mutex},
};

pub struct TestApp {
    pub router: Router,
    pub metrics: Arc<Metrics>,
    pub inputs: Arc<Mutex<Vec<String>>>,
}

pub fn templates_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("templates")
}

pub fn static_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("static")
}

/// Builds the full router around a mock classifier, using the repository's
/// real templates and static assets
pub fn create_test_app(classifier: MockClassifier) -> TestApp {
    let inputs = classifier.inputs();
    let metrics = Arc::new(Metrics::new().expect("metrics registry"));

    let app_state = AppState {
        model: Arc::new(SentimentModel::new(classifier)),
        metrics: Arc::clone(&metrics),
        templates: Arc::new(server::templates(templates_dir()).expect("index template")),
    };

    TestApp {
        router: server::router(app_state, static_dir()),
        metrics,
        inputs,
    }
}

pub fn predict_request(body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/predict")
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap()
}

pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}
