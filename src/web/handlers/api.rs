use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info};

use crate::core::config::{AppConfig, ColorConfig};
use crate::core::error::FieldErrors;
use crate::core::models::QrPayload;
use crate::export::{encode_png, suggested_filename, ExportError};
use crate::payload::{submit_url, submit_wifi, Security};
use crate::render::{QrRenderer, RenderError, SymbolRenderer};

#[derive(Clone)]
pub struct ApiState {
    pub config: Arc<AppConfig>,
    pub renderer: QrRenderer,
}

#[derive(Debug, Deserialize)]
pub struct UrlRequest {
    pub url: String,
    #[serde(default)]
    pub foreground: Option<String>,
    #[serde(default)]
    pub background: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct WifiRequest {
    pub ssid: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub security: Security,
    #[serde(default)]
    pub foreground: Option<String>,
    #[serde(default)]
    pub background: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PngRequest {
    Url(UrlRequest),
    Wifi(WifiRequest),
}

fn colors<'a>(
    foreground: &'a Option<String>,
    background: &'a Option<String>,
    defaults: &'a ColorConfig,
) -> (&'a str, &'a str) {
    (
        foreground.as_deref().unwrap_or(&defaults.foreground),
        background.as_deref().unwrap_or(&defaults.background),
    )
}

impl UrlRequest {
    fn submit(&self, defaults: &ColorConfig) -> Result<QrPayload, FieldErrors> {
        let (fg, bg) = colors(&self.foreground, &self.background, defaults);
        submit_url(&self.url, fg, bg)
    }
}

impl WifiRequest {
    fn submit(&self, defaults: &ColorConfig) -> Result<QrPayload, FieldErrors> {
        let (fg, bg) = colors(&self.foreground, &self.background, defaults);
        submit_wifi(&self.ssid, &self.password, self.security, fg, bg)
    }
}

impl PngRequest {
    fn submit(&self, defaults: &ColorConfig) -> Result<QrPayload, FieldErrors> {
        match self {
            PngRequest::Url(request) => request.submit(defaults),
            PngRequest::Wifi(request) => request.submit(defaults),
        }
    }
}

#[derive(Debug)]
pub enum ApiError {
    Validation(FieldErrors),
    Render(RenderError),
    Export(ExportError),
}

impl From<FieldErrors> for ApiError {
    fn from(errors: FieldErrors) -> Self {
        ApiError::Validation(errors)
    }
}

impl From<RenderError> for ApiError {
    fn from(e: RenderError) -> Self {
        ApiError::Render(e)
    }
}

impl From<ExportError> for ApiError {
    fn from(e: ExportError) -> Self {
        ApiError::Export(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(errors) => {
                info!("Rejected submission: {}", errors);
                (StatusCode::UNPROCESSABLE_ENTITY, Json(errors)).into_response()
            }
            // Oversized payloads are the user's to fix, not a server fault.
            ApiError::Render(e @ RenderError::Encode(_)) => {
                (StatusCode::UNPROCESSABLE_ENTITY, Json(json!({ "error": e.to_string() }))).into_response()
            }
            ApiError::Render(e) => {
                error!("Failed to render QR code: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": e.to_string() }))).into_response()
            }
            ApiError::Export(e) => {
                error!("Failed to export QR code: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": e.to_string() }))).into_response()
            }
        }
    }
}

pub async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
        "service": "qrforge"
    }))
}

pub async fn create_url_payload(
    State(state): State<ApiState>,
    Json(request): Json<UrlRequest>,
) -> Result<Json<QrPayload>, ApiError> {
    let payload = request.submit(&state.config.colors)?;
    info!("Built url payload");
    Ok(Json(payload))
}

pub async fn create_wifi_payload(
    State(state): State<ApiState>,
    Json(request): Json<WifiRequest>,
) -> Result<Json<QrPayload>, ApiError> {
    let payload = request.submit(&state.config.colors)?;
    info!("Built wifi payload for security {}", request.security);
    Ok(Json(payload))
}

/// Validate, render and return the PNG as a file download.
pub async fn download_png(
    State(state): State<ApiState>,
    Json(request): Json<PngRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let payload = request.submit(&state.config.colors)?;
    let surface = state.renderer.render_payload(&payload, &state.config.render)?;
    let png = encode_png(&surface)?;
    let filename = suggested_filename(payload.kind(), chrono::Utc::now());

    info!("Serving {} ({} bytes)", filename, png.len());
    Ok((
        [
            (header::CONTENT_TYPE, "image/png".to_string()),
            (header::CONTENT_DISPOSITION, format!("attachment; filename=\"{}\"", filename)),
        ],
        png,
    ))
}

/// Handle 404 errors for API routes
pub async fn api_not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({
        "error": "API endpoint not found"
    })))
}
