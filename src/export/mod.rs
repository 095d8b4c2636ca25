//! Turns a rendered symbol into a PNG file or clipboard image.

pub mod sink;

pub use sink::{ClipboardError, ClipboardSink, CommandClipboard, DirectorySink, FileSink, NoClipboard};

use chrono::{DateTime, Utc};
use image::codecs::png::PngEncoder;
use image::{ColorType, ImageEncoder, ImageError};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;
use tracing::{error, info};

use crate::core::models::PayloadKind;
use crate::render::{NotReady, RasterSurface, RenderError};

pub const COPY_LABEL: &str = "Copy to Clipboard";
pub const COPIED_LABEL: &str = "Copied!";
pub const DEFAULT_COPIED_FEEDBACK: Duration = Duration::from_millis(2000);

#[derive(Error, Debug)]
pub enum ExportError {
    #[error(transparent)]
    NotReady(#[from] NotReady),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("PNG encoding failed: {0}")]
    Encode(#[from] ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result of a clipboard export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyOutcome {
    Copied,
    Failed(String),
}

impl CopyOutcome {
    pub fn is_copied(&self) -> bool {
        matches!(self, CopyOutcome::Copied)
    }
}

pub fn encode_png(surface: &RasterSurface) -> Result<Vec<u8>, ExportError> {
    let image = surface.image();
    let mut bytes = Vec::new();
    PngEncoder::new(&mut bytes).write_image(
        image.as_raw(),
        image.width(),
        image.height(),
        ColorType::Rgba8,
    )?;
    Ok(bytes)
}

/// `qrcode-<kind>-<unix-ms>.png`
pub fn suggested_filename(kind: PayloadKind, at: DateTime<Utc>) -> String {
    format!("qrcode-{}-{}.png", kind, at.timestamp_millis())
}

/// Encode the surface and hand it to `sink` once, under a timestamped name.
pub fn export_as_file<S: FileSink>(
    surface: Result<&RasterSurface, NotReady>,
    kind: PayloadKind,
    sink: &S,
) -> Result<PathBuf, ExportError> {
    let png = encode_png(surface?)?;
    let filename = suggested_filename(kind, Utc::now());
    sink.save(&filename, &png)
}

/// Encode the surface and write it to the clipboard.
///
/// Never errors: any failure comes back as [`CopyOutcome::Failed`] so the
/// caller can tell the user.
pub async fn export_to_clipboard<C: ClipboardSink>(
    surface: Result<&RasterSurface, NotReady>,
    clipboard: &C,
) -> CopyOutcome {
    let png = match surface.map_err(ExportError::from).and_then(encode_png) {
        Ok(png) => png,
        Err(e) => {
            error!("Failed to copy QR code: {}", e);
            return CopyOutcome::Failed(e.to_string());
        }
    };

    let len = png.len();
    match clipboard.write_png(png).await {
        Ok(()) => {
            info!("Copied {} byte PNG to clipboard", len);
            CopyOutcome::Copied
        }
        Err(e) => {
            error!("Failed to copy QR code: {}", e);
            CopyOutcome::Failed(e.to_string())
        }
    }
}

/// The transient "Copied!" acknowledgement shown after a successful copy.
///
/// Active for `window` after the most recent successful copy; a new copy
/// inside the window restarts it.
#[derive(Debug, Clone, Copy)]
pub struct CopyFeedback {
    window: Duration,
    copied_at: Option<Instant>,
}

impl Default for CopyFeedback {
    fn default() -> Self {
        Self::new(DEFAULT_COPIED_FEEDBACK)
    }
}

impl CopyFeedback {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            copied_at: None,
        }
    }

    pub fn mark_copied(&mut self, now: Instant) {
        self.copied_at = Some(now);
    }

    /// Marks on `Copied`; a failed copy leaves any running window alone.
    pub fn record(&mut self, outcome: &CopyOutcome, now: Instant) {
        if outcome.is_copied() {
            self.mark_copied(now);
        }
    }

    pub fn is_copied(&self, now: Instant) -> bool {
        self.copied_at
            .is_some_and(|at| now.saturating_duration_since(at) < self.window)
    }

    pub fn label(&self, now: Instant) -> &'static str {
        if self.is_copied(now) {
            COPIED_LABEL
        } else {
            COPY_LABEL
        }
    }

    /// When the acknowledgement reverts, if it is showing.
    pub fn expires_at(&self, now: Instant) -> Option<Instant> {
        self.copied_at
            .map(|at| at + self.window)
            .filter(|_| self.is_copied(now))
    }

    pub fn reset(&mut self) {
        self.copied_at = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::Color;
    use crate::render::{ErrorCorrection, QrRenderer, SymbolRenderer};
    use chrono::TimeZone;
    use std::sync::Mutex;
    use tempfile::TempDir;
    use tokio::time::advance;

    fn surface() -> RasterSurface {
        QrRenderer::default()
            .render("https://example.com", ErrorCorrection::H, Color::BLACK, Color::WHITE, 250)
            .unwrap()
    }

    #[derive(Default)]
    struct MemorySink {
        saved: Mutex<Vec<(String, Vec<u8>)>>,
    }

    impl FileSink for MemorySink {
        fn save(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf, ExportError> {
            self.saved.lock().unwrap().push((filename.to_string(), bytes.to_vec()));
            Ok(PathBuf::from(filename))
        }
    }

    #[derive(Default)]
    struct MemoryClipboard {
        contents: Mutex<Option<Vec<u8>>>,
    }

    impl ClipboardSink for MemoryClipboard {
        fn write_png(&self, png: Vec<u8>) -> impl std::future::Future<Output = Result<(), ClipboardError>> + Send {
            *self.contents.lock().unwrap() = Some(png);
            async { Ok(()) }
        }
    }

    #[test]
    fn test_encode_png_decodes_back() {
        let png = encode_png(&surface()).unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");

        let decoded = image::load_from_memory(&png).unwrap();
        assert_eq!(decoded.width(), 250);
        assert_eq!(decoded.height(), 250);
    }

    #[test]
    fn test_suggested_filename() {
        let at = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        assert_eq!(suggested_filename(PayloadKind::Url, at), "qrcode-url-1700000000123.png");
        assert_eq!(suggested_filename(PayloadKind::Wifi, at), "qrcode-wifi-1700000000123.png");
    }

    #[test]
    fn test_export_as_file_saves_once() {
        let sink = MemorySink::default();
        let surface = surface();

        let path = export_as_file(Ok(&surface), PayloadKind::Wifi, &sink).unwrap();

        let saved = sink.saved.lock().unwrap();
        assert_eq!(saved.len(), 1);
        let (name, bytes) = &saved[0];
        assert_eq!(path, PathBuf::from(name));
        assert!(name.starts_with("qrcode-wifi-"));
        assert!(name.ends_with(".png"));
        assert_eq!(bytes, &encode_png(&surface).unwrap());
    }

    #[test]
    fn test_export_as_file_without_surface() {
        let sink = MemorySink::default();
        let err = export_as_file(Err(NotReady), PayloadKind::Url, &sink).unwrap_err();
        assert!(matches!(err, ExportError::NotReady(NotReady)));
        assert!(sink.saved.lock().unwrap().is_empty());
    }

    #[test]
    fn test_export_to_directory() {
        let temp_dir = TempDir::new().unwrap();
        let sink = DirectorySink::new(temp_dir.path());

        let path = export_as_file(Ok(&surface()), PayloadKind::Url, &sink).unwrap();
        assert!(path.exists());
        assert!(image::open(&path).is_ok());
    }

    #[tokio::test]
    async fn test_export_to_clipboard_copied() {
        let clipboard = MemoryClipboard::default();
        let surface = surface();

        let outcome = export_to_clipboard(Ok(&surface), &clipboard).await;

        assert_eq!(outcome, CopyOutcome::Copied);
        let contents = clipboard.contents.lock().unwrap().clone().unwrap();
        assert_eq!(contents, encode_png(&surface).unwrap());
    }

    #[tokio::test]
    async fn test_export_to_clipboard_without_surface() {
        let clipboard = MemoryClipboard::default();
        let outcome = export_to_clipboard(Err(NotReady), &clipboard).await;

        assert_eq!(outcome, CopyOutcome::Failed("QR code has not been rendered yet".to_string()));
        assert!(clipboard.contents.lock().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_export_to_clipboard_rejected() {
        let outcome = export_to_clipboard(Ok(&surface()), &NoClipboard).await;
        assert!(matches!(outcome, CopyOutcome::Failed(reason) if reason.contains("clipboard")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_feedback_reverts_after_exactly_2000ms() {
        let mut feedback = CopyFeedback::default();
        assert!(!feedback.is_copied(Instant::now()));
        assert_eq!(feedback.label(Instant::now()), COPY_LABEL);

        feedback.record(&CopyOutcome::Copied, Instant::now());
        assert!(feedback.is_copied(Instant::now()));
        assert_eq!(feedback.label(Instant::now()), COPIED_LABEL);

        advance(Duration::from_millis(1999)).await;
        assert!(feedback.is_copied(Instant::now()));

        advance(Duration::from_millis(1)).await;
        assert!(!feedback.is_copied(Instant::now()));
        assert_eq!(feedback.label(Instant::now()), COPY_LABEL);
    }

    #[tokio::test(start_paused = true)]
    async fn test_feedback_restarts_on_new_copy() {
        let mut feedback = CopyFeedback::default();
        feedback.record(&CopyOutcome::Copied, Instant::now());

        advance(Duration::from_millis(1500)).await;
        feedback.mark_copied(Instant::now());
        let expires = feedback.expires_at(Instant::now()).unwrap();

        advance(Duration::from_millis(1500)).await;
        assert!(feedback.is_copied(Instant::now()));

        advance(Duration::from_millis(500)).await;
        assert_eq!(Instant::now(), expires);
        assert!(!feedback.is_copied(Instant::now()));
        assert_eq!(feedback.expires_at(Instant::now()), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_copy_does_not_extend_window() {
        let mut feedback = CopyFeedback::default();
        feedback.record(&CopyOutcome::Copied, Instant::now());

        advance(Duration::from_millis(1000)).await;
        feedback.record(&CopyOutcome::Failed("denied".to_string()), Instant::now());

        advance(Duration::from_millis(1000)).await;
        assert!(!feedback.is_copied(Instant::now()));
    }

    #[test]
    fn test_feedback_reset() {
        let now = Instant::now();
        let mut feedback = CopyFeedback::new(Duration::from_secs(60));
        feedback.record(&CopyOutcome::Copied, now);
        feedback.reset();
        assert!(!feedback.is_copied(now));
    }
}
