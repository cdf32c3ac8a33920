use super::types::{ErrorResponse, HealthResponse, PredictionRequest, PredictionResponse};
use crate::{metrics::Metrics, model::SentimentModel};
use axum::{
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Json, Response},
};
use minijinja::{Environment, context};
use std::sync::Arc;
use tracing::{debug, error, warn};

pub const INDEX_TEMPLATE: &str = "index.html";

type ErrorReply = (StatusCode, Json<ErrorResponse>);

#[derive(Clone)]
pub struct AppState {
    pub model: Arc<SentimentModel>,
    pub metrics: Arc<Metrics>,
    pub templates: Arc<Environment<'static>>,
}

fn server_error(message: String) -> ErrorReply {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse { error: message }),
    )
}

pub async fn index(State(state): State<AppState>) -> Result<Html<String>, ErrorReply> {
    let page = state
        .templates
        .get_template(INDEX_TEMPLATE)
        .and_then(|template| template.render(context! { predict_url => "/predict" }))
        .map_err(|e| {
            error!("Failed to render {}: {}", INDEX_TEMPLATE, e);
            server_error(format!("Template error: {}", e))
        })?;

    Ok(Html(page))
}

pub async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<PredictionRequest>, JsonRejection>,
) -> Result<Json<PredictionResponse>, ErrorReply> {
    let Json(request) = payload.map_err(|rejection| {
        warn!("Rejected prediction request: {}", rejection.body_text());
        (
            rejection.status(),
            Json(ErrorResponse {
                error: rejection.body_text(),
            }),
        )
    })?;

    state.metrics.record_request();
    debug!(
        "Received prediction request ({} bytes)",
        request.text.len()
    );

    let model = Arc::clone(&state.model);
    let outcome = tokio::task::spawn_blocking(move || model.predict_sentiment(&request.text)).await;

    match outcome {
        Ok(Ok(prediction)) => Ok(Json(prediction.into())),
        Ok(Err(e)) => {
            error!("Failed to classify text: {}", e);
            Err(server_error(format!("Inference error: {}", e)))
        }
        Err(e) => {
            error!("Inference task failed: {}", e);
            Err(server_error(format!("Inference task failed: {}", e)))
        }
    }
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "healthy" })
}

pub async fn metrics(State(state): State<AppState>) -> Result<Response, ErrorReply> {
    let body = state.metrics.render().map_err(|e| {
        error!("Failed to render metrics: {}", e);
        server_error(e.to_string())
    })?;

    Ok(([(header::CONTENT_TYPE, state.metrics.content_type())], body).into_response())
}
