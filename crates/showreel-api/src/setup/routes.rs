//! Route configuration and setup

use crate::handlers;
use crate::state::AppState;
use axum::{
    extract::{DefaultBodyLimit, State},
    http::{HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use showreel_core::Config;
use showreel_storage::keys::UPLOADS_PREFIX;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Serialize)]
struct HealthCheckResponse {
    status: String,
    storage: String,
}

#[derive(Debug, Serialize)]
struct ReadinessResponse {
    status: String,
    portfolio: String,
    entries: Option<usize>,
}

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router, anyhow::Error> {
    let cors = setup_cors(config)?;

    let uploads_dir = config.media_root.join(UPLOADS_PREFIX);
    tracing::info!(
        uploads_dir = %uploads_dir.display(),
        "Serving uploaded media at /{}",
        UPLOADS_PREFIX
    );

    let app = Router::new()
        .merge(health_routes())
        .merge(portfolio_routes())
        .merge(upload_routes())
        .with_state(state)
        .route(
            "/api/openapi.json",
            get(|| async { Json(crate::api_doc::get_openapi_spec()) }),
        )
        .nest_service(&format!("/{}", UPLOADS_PREFIX), ServeDir::new(uploads_dir))
        .merge(utoipa_rapidoc::RapiDoc::new("/api/openapi.json").path("/docs"))
        .layer(RequestBodyLimitLayer::new(config.max_request_body_bytes()))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    Ok(app)
}

/// Setup CORS configuration
fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let methods = [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::OPTIONS,
    ];

    let cors = if config.cors_origins.iter().any(|o| o == "*") {
        if config.is_production() {
            tracing::warn!("CORS configured to allow all origins - not recommended for production");
        }
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins
            .iter()
            .map(|o| o.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| anyhow::anyhow!("Invalid CORS origin: {}", e))?;

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers(Any)
    };
    Ok(cors)
}

fn health_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health_check))
        .route("/health/ready", get(readiness_check))
}

fn portfolio_routes() -> Router<Arc<AppState>> {
    Router::new().route(
        "/api/portfolio",
        get(handlers::portfolio::list_portfolio)
            .post(handlers::portfolio::create_portfolio_entry)
            .put(handlers::portfolio::update_portfolio)
            .delete(handlers::portfolio::delete_portfolio_entry),
    )
}

/// Upload size is enforced by `RequestBodyLimitLayer` and the intake limits,
/// so axum's default multipart limit is lifted here.
fn upload_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/upload", post(handlers::upload::upload_media))
        .layer(DefaultBodyLimit::disable())
}

async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let mut response = HealthCheckResponse {
        status: "healthy".to_string(),
        storage: "unknown".to_string(),
    };

    // Lightweight exists check on a key that is never written
    match tokio::time::timeout(
        HEALTH_TIMEOUT,
        state.storage.exists("uploads/health-check-non-existent-key"),
    )
    .await
    {
        Ok(Ok(_)) => {
            response.storage = "healthy".to_string();
        }
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "Storage health check warning");
            response.storage = format!("degraded: {}", e);
        }
        Err(_) => {
            tracing::warn!("Storage health check timed out");
            response.storage = "timeout".to_string();
        }
    }

    (StatusCode::OK, Json(response))
}

async fn readiness_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let mut response = ReadinessResponse {
        status: "ready".to_string(),
        portfolio: "unknown".to_string(),
        entries: None,
    };

    let ready = match tokio::time::timeout(HEALTH_TIMEOUT, state.portfolio.list_strict()).await {
        Ok(Ok(entries)) => {
            response.portfolio = "ready".to_string();
            response.entries = Some(entries.len());
            true
        }
        Ok(Err(e)) => {
            tracing::error!(error = %e, "Portfolio readiness check failed");
            response.portfolio = "not_ready".to_string();
            false
        }
        Err(_) => {
            tracing::error!("Portfolio readiness check timed out");
            response.portfolio = "timeout".to_string();
            false
        }
    };

    let status_code = if ready {
        StatusCode::OK
    } else {
        response.status = "not_ready".to_string();
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(response))
}
