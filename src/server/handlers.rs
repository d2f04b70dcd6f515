//! HTTP route handlers

use crate::server::state::AppState;
use actix_web::{HttpResponse, http::header::ContentType, web};
use chrono::{DateTime, Utc};
use prometheus::{Encoder, TextEncoder};
use serde::Serialize;
use std::borrow::Cow;
use tracing::{debug, error};

/// Snapshot details reported by `/health`
#[derive(Debug, Serialize)]
struct SnapshotStatus {
    published_at: Option<DateTime<Utc>>,
    age_seconds: Option<i64>,
    applications: usize,
    last_cycle_duration_seconds: Option<f64>,
    last_error: Option<String>,
}

#[derive(Debug, Serialize)]
struct HealthStatus {
    status: Cow<'static, str>,
    timestamp: DateTime<Utc>,
    version: Cow<'static, str>,
    uptime_seconds: u64,
    snapshot: SnapshotStatus,
}

/// Prometheus scrape endpoint
pub async fn metrics(state: web::Data<AppState>) -> HttpResponse {
    let families = state.registry.gather();
    let encoder = TextEncoder::new();
    let mut buffer = Vec::with_capacity(64 * 1024);

    if let Err(e) = encoder.encode(&families, &mut buffer) {
        error!("Failed to encode Prometheus metrics: {}", e);
        return HttpResponse::InternalServerError().body("Failed to encode metrics");
    }

    HttpResponse::Ok()
        .content_type(encoder.format_type())
        .body(buffer)
}

/// Health check endpoint
///
/// `starting` until the first refresh cycle publishes, `degraded` while the
/// latest cycle reported an error, `healthy` otherwise. Always answers 200.
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    debug!("Health check requested");

    let snapshot = state.store.load();
    let now = Utc::now();

    let status = match (snapshot.published_at(), snapshot.error()) {
        (None, _) => "starting",
        (Some(_), Some(_)) => "degraded",
        (Some(_), None) => "healthy",
    };

    HttpResponse::Ok().json(HealthStatus {
        status: Cow::Borrowed(status),
        timestamp: now,
        version: Cow::Borrowed(env!("CARGO_PKG_VERSION")),
        uptime_seconds: state.started_at.elapsed().as_secs(),
        snapshot: SnapshotStatus {
            published_at: snapshot.published_at(),
            age_seconds: snapshot
                .published_at()
                .map(|at| (now - at).num_seconds()),
            applications: snapshot.len(),
            last_cycle_duration_seconds: snapshot.cycle_duration().map(|d| d.as_secs_f64()),
            last_error: snapshot.error().map(|e| e.to_string()),
        },
    })
}

/// Landing page pointing at the metrics path
pub async fn index(state: web::Data<AppState>) -> HttpResponse {
    let body = format!(
        r#"<html>
<head><title>Cloud Foundry Applications Exporter</title></head>
<body>
<h1>Cloud Foundry Applications Exporter</h1>
<p>Version {}</p>
<p><a href="{path}">Metrics</a></p>
<p><a href="/health">Health</a></p>
</body>
</html>
"#,
        env!("CARGO_PKG_VERSION"),
        path = state.metrics_path(),
    );

    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(body)
}
