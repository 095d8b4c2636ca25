use qrcode::render::unicode;
use qrcode::QrCode;

use crate::core::error::AppResult;
use crate::render::{ErrorCorrection, RenderError};

/// Draw `data` as a QR code in half-height unicode blocks for a terminal.
pub fn render_terminal(data: &str, level: ErrorCorrection) -> AppResult<String> {
    let code = QrCode::with_error_correction_level(data.as_bytes(), level.into())
        .map_err(RenderError::from)?;
    Ok(code
        .render::<unicode::Dense1x2>()
        .dark_color(unicode::Dense1x2::Light)
        .light_color(unicode::Dense1x2::Dark)
        .quiet_zone(true)
        .build())
}

/// Startup banner pointing phones at the web interface.
pub fn server_banner(url: &str) -> AppResult<String> {
    let qr = render_terminal(url, ErrorCorrection::M)?;

    let mut output = String::new();
    output.push('\n');
    output.push_str("Scan this QR code to open QrForge:\n");
    output.push_str(&qr);
    output.push('\n');
    output.push_str(&format!("Or open: {}\n", url));
    Ok(output)
}
