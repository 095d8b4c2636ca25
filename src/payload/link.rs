use regex::Regex;
use std::sync::LazyLock;
use url::Url;

use crate::core::error::{Field, FieldError};
use crate::core::models::{Color, PayloadKind, QrPayload};

pub const EMPTY_URL: &str = "Please enter a URL";
pub const INVALID_URL: &str = "Please enter a valid URL";

const DEFAULT_SCHEME_PREFIX: &str = "https://";

static HAS_SCHEME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z]+://").expect("scheme pattern is valid")
});

/// Trim `raw` and prefix `https://` when it carries no scheme of its own.
///
/// Returns `None` for blank input.
pub fn normalize_url(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if HAS_SCHEME.is_match(trimmed) {
        Some(trimmed.to_string())
    } else {
        Some(format!("{DEFAULT_SCHEME_PREFIX}{trimmed}"))
    }
}

/// Build a URL payload from free-form user text.
///
/// The normalized string is embedded as typed; the parser is only used to
/// accept or reject it, so an explicit scheme is never rewritten.
pub fn build_url_payload(raw: &str, foreground: Color, background: Color) -> Result<QrPayload, FieldError> {
    let processed = normalize_url(raw).ok_or_else(|| FieldError::new(Field::Url, EMPTY_URL))?;

    Url::parse(&processed).map_err(|_| FieldError::new(Field::Url, INVALID_URL))?;

    Ok(QrPayload::new(PayloadKind::Url, processed, foreground, background))
}
