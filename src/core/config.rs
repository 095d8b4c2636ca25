use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::render::ErrorCorrection;

pub const CONFIG_FILE: &str = "qrforge.toml";
pub const EXAMPLE_CONFIG_FILE: &str = "qrforge.example.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub colors: ColorConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_false")]
    pub open_browser: bool,
    /// Print a terminal QR code of the server address on startup.
    #[serde(default = "default_true")]
    pub qr_code: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    #[serde(default = "default_size")]
    pub size: u32,
    #[serde(default = "default_true")]
    pub margin: bool,
    #[serde(default)]
    pub error_correction: ErrorCorrection,
}

/// Default colors for submissions that do not pick their own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColorConfig {
    #[serde(default = "default_foreground")]
    pub foreground: String,
    #[serde(default = "default_background")]
    pub background: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    pub directory: Option<PathBuf>,
    #[serde(default = "default_copied_feedback_ms")]
    pub copied_feedback_ms: u64,
}

// Default value functions
fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }
fn default_size() -> u32 { 250 }
fn default_foreground() -> String { "#000000".to_string() }
fn default_background() -> String { "#FFFFFF".to_string() }
fn default_copied_feedback_ms() -> u64 { 2000 }
fn default_true() -> bool { true }
fn default_false() -> bool { false }

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            open_browser: default_false(),
            qr_code: default_true(),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            size: default_size(),
            margin: default_true(),
            error_correction: ErrorCorrection::H,
        }
    }
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            foreground: default_foreground(),
            background: default_background(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            directory: None,
            copied_feedback_ms: default_copied_feedback_ms(),
        }
    }
}

impl ExportConfig {
    pub fn copied_feedback(&self) -> Duration {
        Duration::from_millis(self.copied_feedback_ms)
    }
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        let mut builder = config::Config::builder()
            .add_source(config::File::with_name(CONFIG_FILE).required(false))
            .add_source(
                config::Environment::with_prefix("QRFORGE")
                    .prefix_separator("_")
                    .separator("__"),
            );

        // Override with individual environment variables
        if let Ok(port) = std::env::var("PORT") {
            builder = builder.set_override("server.port", port)?;
        }
        if let Ok(host) = std::env::var("HOST") {
            builder = builder.set_override("server.host", host)?;
        }
        if let Ok(dir) = std::env::var("QRFORGE_OUTPUT_DIR") {
            builder = builder.set_override("export.directory", dir)?;
        }

        let settings = builder.build()?;
        let config: AppConfig = settings.try_deserialize()?;
        Ok(config)
    }

    pub fn save_example() -> Result<PathBuf> {
        let toml_string = toml::to_string_pretty(&AppConfig::default())?;
        let path = PathBuf::from(EXAMPLE_CONFIG_FILE);
        std::fs::write(&path, toml_string)?;
        Ok(path)
    }

    pub fn from_toml(toml_content: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(toml_content)?;
        Ok(config)
    }
}
