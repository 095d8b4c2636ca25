//! QrForge - URL and WiFi QR code generator
//!
//! Raw form input is validated into an immutable [`QrPayload`], rendered at
//! error-correction level H, and exported as a PNG file or clipboard image.

pub mod cli;
pub mod core;
pub mod export;
pub mod form;
pub mod payload;
pub mod render;
pub mod utils;
pub mod web;

// Re-export commonly used types for convenience
pub use crate::core::{
    app::Session,
    config::AppConfig,
    error::{AppError, AppResult, Field, FieldError, FieldErrors},
    models::{Color, PayloadKind, QrPayload},
};

pub use payload::{build_url_payload, build_wifi_payload, submit_url, submit_wifi, Security};

pub use export::{export_as_file, export_to_clipboard, CopyFeedback, CopyOutcome};

pub use render::{ErrorCorrection, NotReady, QrRenderer, RasterSurface, SymbolRenderer};

pub use web::{routes::create_routes, server::WebServer};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
