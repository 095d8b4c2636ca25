mod session;

pub use session::Session;

use anyhow::Result;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info};

use crate::core::config::AppConfig;
use crate::utils::network::local_url;
use crate::utils::qrcode::server_banner;
use crate::web::server::WebServer;

/// The `serve` command: the web generator on a local port.
pub struct App {
    addr: SocketAddr,
    config: AppConfig,
}

impl App {
    pub fn new(addr: SocketAddr, config: AppConfig) -> Self {
        Self { addr, config }
    }

    pub async fn run(&self) -> Result<()> {
        let url = local_url(self.addr.port());
        info!("Web interface available at: {}", url);

        if self.config.server.qr_code {
            match server_banner(&url) {
                Ok(banner) => println!("{}", banner),
                Err(e) => error!("Failed to generate QR code: {}", e),
            }
        }

        if self.config.server.open_browser {
            if let Err(e) = open::that(&url) {
                error!("Failed to open browser: {}", e);
            }
        }

        let server = WebServer::new(self.addr, self.config.clone());

        let shutdown_signal = async {
            if let Err(e) = signal::ctrl_c().await {
                error!("Failed to listen for Ctrl+C: {}", e);
                std::future::pending::<()>().await;
            }
            info!("Received Ctrl+C, shutting down gracefully...");
        };

        tokio::select! {
            result = server.run() => {
                if let Err(e) = result {
                    error!("Server error: {}", e);
                    return Err(e.into());
                }
            }
            _ = shutdown_signal => {
                info!("Shutdown signal received");
            }
        }

        info!("Shutdown complete");
        Ok(())
    }
}
