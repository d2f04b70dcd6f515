//! HTTP server exposing the metrics endpoint
//!
//! Serves the Prometheus text exposition at the configured path, a JSON
//! health report at `/health` and a landing page at `/`.

mod handlers;
pub mod server;
pub mod state;


pub use server::{HttpServer, configure_routes};
pub use state::AppState;
