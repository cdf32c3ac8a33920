pub mod handlers;
pub mod types;

use crate::{Error, Result, config::Config, metrics::Metrics, model::SentimentModel};
use axum::{
    Router,
    routing::{get, post},
};
use handlers::{AppState, INDEX_TEMPLATE};
use minijinja::Environment;
use std::{net::SocketAddr, path::Path, sync::Arc};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing::info;

/// Template environment reading from `dir`. Fails if the index page is
/// missing so a broken deployment does not start.
pub fn templates(dir: impl AsRef<Path>) -> Result<Environment<'static>> {
    let mut env = Environment::new();
    env.set_loader(minijinja::path_loader(dir.as_ref().to_path_buf()));
    env.get_template(INDEX_TEMPLATE)?;
    Ok(env)
}

pub fn router(state: AppState, static_dir: impl AsRef<Path>) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/predict", post(handlers::predict))
        .route("/health", get(handlers::health))
        .route("/metrics", get(handlers::metrics))
        .nest_service("/static", ServeDir::new(static_dir.as_ref()))
        .layer(CorsLayer::very_permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run(config: Config) -> Result<()> {
    // Load the model before binding so a bad cache directory never serves traffic
    let model_config = config.model.clone();
    let model = tokio::task::spawn_blocking(move || SentimentModel::load(&model_config))
        .await
        .map_err(|e| Error::internal(format!("Model loading task failed: {}", e)))??;

    let app_state = AppState {
        model: Arc::new(model),
        metrics: Arc::new(Metrics::new()?),
        templates: Arc::new(templates(&config.server.templates_dir)?),
    };

    let app = router(app_state, &config.server.static_dir);

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
