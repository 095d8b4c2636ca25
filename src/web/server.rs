use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::core::config::AppConfig;
use crate::core::error::{AppError, AppResult};
use crate::web::routes::create_routes;

pub struct WebServer {
    addr: SocketAddr,
    config: AppConfig,
}

impl WebServer {
    pub fn new(addr: SocketAddr, config: AppConfig) -> Self {
        Self { addr, config }
    }

    pub async fn run(&self) -> AppResult<()> {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        let app = create_routes(self.config.clone())
            .layer(TraceLayer::new_for_http())
            .layer(cors);

        info!("Starting web server on {}", self.addr);
        let listener = TcpListener::bind(self.addr).await?;
        axum::serve(listener, app)
            .await
            .map_err(|e| AppError::Server(e.to_string()))?;

        Ok(())
    }
}
