use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::core::config::AppConfig;
use crate::render::QrRenderer;
use crate::web::handlers::{
    api::{api_not_found, create_url_payload, create_wifi_payload, download_png, health_check, ApiState},
    static_files::serve_index,
};

pub fn create_routes(config: AppConfig) -> Router {
    let state = ApiState {
        renderer: QrRenderer::from(&config.render),
        config: Arc::new(config),
    };

    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/qr/url", post(create_url_payload))
        .route("/qr/wifi", post(create_wifi_payload))
        .route("/qr/png", post(download_png))
        .fallback(api_not_found)
        .with_state(state);

    Router::new()
        .nest("/api", api_routes)
        .fallback(serve_index)
}
