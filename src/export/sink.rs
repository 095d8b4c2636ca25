use std::future::Future;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, info};

use super::ExportError;

/// Somewhere a finished image can be saved under a suggested file name.
pub trait FileSink {
    fn save(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf, ExportError>;
}

/// Saves files into a fixed directory, creating it on first use.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    directory: PathBuf,
}

impl DirectorySink {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }
}

impl FileSink for DirectorySink {
    fn save(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf, ExportError> {
        std::fs::create_dir_all(&self.directory)?;
        let path = self.directory.join(filename);
        std::fs::write(&path, bytes)?;
        info!("Saved {} ({} bytes)", path.display(), bytes.len());
        Ok(path)
    }
}

#[derive(Error, Debug)]
pub enum ClipboardError {
    #[error("no clipboard tool found (install wl-clipboard or xclip)")]
    Unavailable,

    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with {status}")]
    Rejected { program: String, status: String },
}

/// The system clipboard, as far as writing a PNG image to it.
pub trait ClipboardSink {
    fn write_png(&self, png: Vec<u8>) -> impl Future<Output = Result<(), ClipboardError>> + Send;
}

/// Writes to the clipboard by piping the image into an external tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandClipboard {
    program: String,
    args: Vec<String>,
}

impl CommandClipboard {
    pub fn new(program: impl Into<String>, args: &[&str]) -> Self {
        Self {
            program: program.into(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }

    /// Pick a clipboard tool for the current desktop session.
    pub fn detect() -> Option<Self> {
        if std::env::var_os("WAYLAND_DISPLAY").is_some() {
            Some(Self::new("wl-copy", &["--type", "image/png"]))
        } else if std::env::var_os("DISPLAY").is_some() {
            Some(Self::new("xclip", &["-selection", "clipboard", "-t", "image/png", "-i"]))
        } else {
            None
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    async fn pipe(&self, png: Vec<u8>) -> Result<(), ClipboardError> {
        let spawn_error = |source| ClipboardError::Spawn {
            program: self.program.clone(),
            source,
        };

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(spawn_error)?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(&png).await.map_err(spawn_error)?;
            // closing stdin lets the tool finish reading
            drop(stdin);
        }

        let status = child.wait().await.map_err(spawn_error)?;
        debug!("{} exited with {}", self.program, status);

        if status.success() {
            Ok(())
        } else {
            Err(ClipboardError::Rejected {
                program: self.program.clone(),
                status: status.to_string(),
            })
        }
    }
}

impl ClipboardSink for CommandClipboard {
    fn write_png(&self, png: Vec<u8>) -> impl Future<Output = Result<(), ClipboardError>> + Send {
        self.pipe(png)
    }
}

/// Used when [`CommandClipboard::detect`] finds nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoClipboard;

impl ClipboardSink for NoClipboard {
    fn write_png(&self, _png: Vec<u8>) -> impl Future<Output = Result<(), ClipboardError>> + Send {
        async { Err(ClipboardError::Unavailable) }
    }
}
