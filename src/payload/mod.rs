//! Turns raw form input into a validated [`QrPayload`].
//!
//! Everything here is pure: the same input always produces the same payload
//! or the same field errors.

pub mod link;
pub mod wifi;

pub use self::link::{build_url_payload, normalize_url};
pub use self::wifi::{
    build_wifi_payload, parse_wifi_payload, Security, WifiInput, WifiNetwork, WifiParseError,
};

use crate::core::error::{Field, FieldError, FieldErrors};
use crate::core::models::{Color, QrPayload};

pub const INVALID_COLOR: &str = "Please enter a valid color";

/// Parse the two color fields, reporting each bad one against its own field.
pub fn parse_colors(foreground: &str, background: &str) -> Result<(Color, Color), FieldErrors> {
    let mut errors = FieldErrors::default();

    let fg = foreground
        .parse::<Color>()
        .map_err(|_| errors.push(FieldError::new(Field::Foreground, INVALID_COLOR)))
        .ok();
    let bg = background
        .parse::<Color>()
        .map_err(|_| errors.push(FieldError::new(Field::Background, INVALID_COLOR)))
        .ok();

    match (fg, bg) {
        (Some(fg), Some(bg)) => Ok((fg, bg)),
        _ => Err(errors),
    }
}

/// Validate a URL submission including its colors.
pub fn submit_url(raw: &str, foreground: &str, background: &str) -> Result<QrPayload, FieldErrors> {
    let colors = parse_colors(foreground, background);
    let (fg, bg) = colors.clone().unwrap_or((Color::BLACK, Color::WHITE));

    match (build_url_payload(raw, fg, bg), colors) {
        (Ok(payload), Ok(_)) => Ok(payload),
        (Ok(_), Err(errors)) => Err(errors),
        (Err(url_error), Ok(_)) => Err(url_error.into()),
        (Err(url_error), Err(mut errors)) => {
            errors.push(url_error);
            Err(errors)
        }
    }
}

/// Validate a WiFi submission including its colors.
pub fn submit_wifi(
    ssid: &str,
    password: &str,
    security: Security,
    foreground: &str,
    background: &str,
) -> Result<QrPayload, FieldErrors> {
    let colors = parse_colors(foreground, background);
    let (fg, bg) = colors.clone().unwrap_or((Color::BLACK, Color::WHITE));

    match (build_wifi_payload(ssid, password, security, fg, bg), colors) {
        (Ok(payload), Ok(_)) => Ok(payload),
        (Ok(_), Err(errors)) => Err(errors),
        (Err(errors), Ok(_)) => Err(errors),
        (Err(mut errors), Err(color_errors)) => {
            errors.extend(color_errors);
            Err(errors)
        }
    }
}
