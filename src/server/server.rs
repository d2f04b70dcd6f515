//! HTTP server core implementation

use crate::config::ServerConfig;
use crate::server::handlers::{health_check, index, metrics};
use crate::server::state::AppState;
use crate::utils::error::{ExporterError, Result};
use actix_web::{
    App, HttpServer as ActixHttpServer,
    middleware::{DefaultHeaders, Logger},
    web,
};
use tracing::info;

/// HTTP server
pub struct HttpServer {
    config: ServerConfig,
    state: AppState,
}

/// Register the exporter routes; the metrics path is configurable
pub fn configure_routes(cfg: &mut web::ServiceConfig, metrics_path: &str) {
    cfg.route(metrics_path, web::get().to(metrics))
        .route("/health", web::get().to(health_check))
        .route("/", web::get().to(index));
}

impl HttpServer {
    pub fn new(config: &ServerConfig, state: AppState) -> Self {
        Self {
            config: config.clone(),
            state,
        }
    }

    fn create_app(
        state: web::Data<AppState>,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        let metrics_path = state.metrics_path().to_string();

        App::new()
            .app_data(state)
            .wrap(Logger::default())
            .wrap(DefaultHeaders::new().add((
                "Server",
                concat!("cf-applications-exporter/", env!("CARGO_PKG_VERSION")),
            )))
            .configure(|cfg| configure_routes(cfg, &metrics_path))
    }

    /// Serve until the process receives a shutdown signal
    pub async fn start(self) -> Result<()> {
        let bind_addr = self.config.address();
        info!(
            "Starting HTTP server on {} (metrics at {})",
            bind_addr, self.config.metrics_path
        );

        let state = web::Data::new(self.state);

        let server = ActixHttpServer::new(move || Self::create_app(state.clone()))
            .bind(&bind_addr)
            .map_err(|e| {
                ExporterError::Config(format!("Failed to bind to {}: {}", bind_addr, e))
            })?
            .run();

        server
            .await
            .map_err(|e| ExporterError::internal(format!("Server error: {}", e)))?;

        info!("HTTP server stopped");
        Ok(())
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }
}
