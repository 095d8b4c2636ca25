use std::path::PathBuf;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{info, warn};

use crate::core::config::{AppConfig, RenderConfig};
use crate::export::{self, ClipboardSink, CopyFeedback, CopyOutcome, ExportError, FileSink};
use crate::form::{reduce, Action, FormState, View};
use crate::render::{NotReady, RasterSurface, RenderError, SymbolRenderer};

/// One user's generator screen: the form, the symbol on display and the
/// copy acknowledgement.
///
/// The render result lives exactly as long as the payload it was rendered
/// from is on display. A payload that could not be rendered stays on display
/// with its error, so exports report why instead of `NotReady`.
pub struct Session<R: SymbolRenderer> {
    renderer: R,
    render: RenderConfig,
    state: FormState,
    surface: Option<Result<RasterSurface, RenderError>>,
    feedback: CopyFeedback,
}

impl<R: SymbolRenderer> Session<R> {
    pub fn new(renderer: R, config: &AppConfig) -> Self {
        Self {
            renderer,
            render: config.render.clone(),
            state: FormState::with_default_colors(&config.colors.foreground, &config.colors.background),
            surface: None,
            feedback: CopyFeedback::new(config.export.copied_feedback()),
        }
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    /// Apply one action, rendering the symbol when a submission succeeds.
    pub fn dispatch(&mut self, action: Action) -> &FormState {
        let was_showing = self.state.payload().is_some();
        let state = std::mem::take(&mut self.state);
        self.state = reduce(state, action);

        match self.state.view() {
            View::Display(payload) if !was_showing => {
                info!("Generated {} QR code", payload.kind());
                let rendered = self.renderer.render_payload(payload, &self.render);
                if let Err(e) = &rendered {
                    warn!("Failed to render QR code: {}", e);
                }
                self.surface = Some(rendered);
            }
            View::Editing if was_showing => {
                self.surface = None;
                self.feedback.reset();
            }
            _ => {}
        }

        &self.state
    }

    pub fn surface(&self) -> Result<&RasterSurface, NotReady> {
        match &self.surface {
            Some(Ok(surface)) => Ok(surface),
            _ => Err(NotReady),
        }
    }

    /// Why the payload on display has no surface, if rendering failed.
    pub fn render_error(&self) -> Option<&RenderError> {
        self.surface.as_ref().and_then(|rendered| rendered.as_ref().err())
    }

    pub fn request_download<S: FileSink>(&self, sink: &S) -> Result<PathBuf, ExportError> {
        let kind = self.state.payload().ok_or(NotReady)?.kind();
        if let Some(e) = self.render_error() {
            return Err(e.clone().into());
        }
        export::export_as_file(self.surface(), kind, sink)
    }

    pub async fn request_copy<C: ClipboardSink>(&mut self, clipboard: &C) -> CopyOutcome {
        let outcome = match self.render_error() {
            Some(e) => CopyOutcome::Failed(e.to_string()),
            None => export::export_to_clipboard(self.surface(), clipboard).await,
        };
        self.feedback.record(&outcome, Instant::now());
        outcome
    }

    pub fn copy_label(&self) -> &'static str {
        self.feedback.label(Instant::now())
    }

    pub fn copied_for(&self) -> Option<Duration> {
        let now = Instant::now();
        self.feedback.expires_at(now).map(|at| at - now)
    }
}
