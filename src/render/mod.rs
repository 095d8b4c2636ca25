use image::RgbaImage;
use qrcode::types::QrError;
use qrcode::{EcLevel, QrCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::core::config::RenderConfig;
use crate::core::models::{Color, QrPayload};

/// Modules of blank border on each side when the margin is enabled.
pub const QUIET_ZONE_MODULES: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ErrorCorrection {
    L,
    M,
    Q,
    #[default]
    H,
}

impl From<ErrorCorrection> for EcLevel {
    fn from(level: ErrorCorrection) -> Self {
        match level {
            ErrorCorrection::L => EcLevel::L,
            ErrorCorrection::M => EcLevel::M,
            ErrorCorrection::Q => EcLevel::Q,
            ErrorCorrection::H => EcLevel::H,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error("failed to encode QR symbol: {0}")]
    Encode(#[from] QrError),

    #[error("{size}px is too small for a {modules}x{modules} symbol")]
    TooSmall { size: u32, modules: u32 },
}

/// Returned where a rendered surface is expected but none exists yet.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("QR code has not been rendered yet")]
pub struct NotReady;

/// A rendered, square RGBA raster of a QR symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterSurface {
    image: RgbaImage,
}

impl RasterSurface {
    pub fn new(image: RgbaImage) -> Self {
        Self { image }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn size(&self) -> u32 {
        self.image.width()
    }
}

/// The symbol rendering capability.
pub trait SymbolRenderer {
    fn render(
        &self,
        data: &str,
        level: ErrorCorrection,
        foreground: Color,
        background: Color,
        size: u32,
    ) -> Result<RasterSurface, RenderError>;

    /// Render a payload with the configured level and size.
    fn render_payload(&self, payload: &QrPayload, config: &RenderConfig) -> Result<RasterSurface, RenderError> {
        self.render(
            payload.data(),
            config.error_correction,
            payload.foreground(),
            payload.background(),
            config.size,
        )
    }
}

/// Renders with the `qrcode` crate onto an `image` buffer.
#[derive(Debug, Clone, Copy)]
pub struct QrRenderer {
    margin: bool,
}

impl QrRenderer {
    pub fn new(margin: bool) -> Self {
        Self { margin }
    }
}

impl Default for QrRenderer {
    fn default() -> Self {
        Self::new(true)
    }
}

impl From<&RenderConfig> for QrRenderer {
    fn from(config: &RenderConfig) -> Self {
        Self::new(config.margin)
    }
}

impl SymbolRenderer for QrRenderer {
    fn render(
        &self,
        data: &str,
        level: ErrorCorrection,
        foreground: Color,
        background: Color,
        size: u32,
    ) -> Result<RasterSurface, RenderError> {
        let code = QrCode::with_error_correction_level(data.as_bytes(), level.into())?;
        let width = code.width() as u32;
        let colors = code.to_colors();

        let quiet = if self.margin { QUIET_ZONE_MODULES } else { 0 };
        let total = width + 2 * quiet;
        if size < total {
            return Err(RenderError::TooSmall { size, modules: total });
        }

        debug!("Rendering {}x{} symbol at {}px", width, width, size);

        let fg = foreground.to_rgba();
        let bg = background.to_rgba();

        // Nearest-neighbour scaling so the output is exactly `size` pixels
        // square whatever the module count.
        let image = RgbaImage::from_fn(size, size, |x, y| {
            let mx = (x as u64 * total as u64 / size as u64) as u32;
            let my = (y as u64 * total as u64 / size as u64) as u32;
            if mx < quiet || my < quiet || mx >= quiet + width || my >= quiet + width {
                return bg;
            }
            let index = ((my - quiet) * width + (mx - quiet)) as usize;
            match colors[index] {
                qrcode::Color::Dark => fg,
                qrcode::Color::Light => bg,
            }
        });

        Ok(RasterSurface::new(image))
    }
}
