use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Instant;
use utoipa::ToSchema;

use crate::{
    dto::{ForecastRequest, HistoryPoint, PricingProduct, PricingRequest, SeriesItem},
    handlers::AppState,
    metrics::METRICS,
};

/// Component health status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ComponentStatus {
    Up,
    Down,
}

/// Individual component health details
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ComponentHealth {
    pub status: ComponentStatus,
    pub message: String,
    pub latency_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthDetails {
    pub forecasting: ComponentHealth,
    pub pricing: ComponentHealth,
    pub metrics: ComponentHealth,
}

/// Readiness response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: ComponentStatus,
    pub version: String,
    pub timestamp: String,
    pub uptime_secs: u64,
    pub details: HealthDetails,
    pub response_time_ms: u64,
}

/// Minimal health body
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StatusResponse {
    #[schema(example = "ok")]
    pub status: String,
}

/// Tracks application start time for uptime calculation
static START_TIME: std::sync::OnceLock<Instant> = std::sync::OnceLock::new();

/// Initialize the start time (call this on application startup)
pub fn init_start_time() {
    let _ = START_TIME.get_or_init(Instant::now);
}

fn get_uptime_secs() -> u64 {
    START_TIME.get().map(|t| t.elapsed().as_secs()).unwrap_or(0)
}

fn check<F>(check: F) -> ComponentHealth
where
    F: FnOnce() -> Result<(), String>,
{
    let started = Instant::now();
    let result = check();
    let latency_ms = started.elapsed().as_millis() as u64;

    match result {
        Ok(()) => ComponentHealth {
            status: ComponentStatus::Up,
            message: "ok".to_string(),
            latency_ms,
        },
        Err(message) => ComponentHealth {
            status: ComponentStatus::Down,
            message,
            latency_ms,
        },
    }
}

fn smoke_date() -> Result<NaiveDate, String> {
    NaiveDate::from_ymd_opt(2024, 1, 1).ok_or_else(|| "invalid smoke date".to_string())
}

fn check_forecasting(state: &AppState) -> Result<(), String> {
    let request = ForecastRequest {
        history_days: 1,
        horizon_days: 1,
        series: vec![SeriesItem {
            producto_id: 0,
            producto_nombre: None,
            history: vec![HistoryPoint {
                fecha: smoke_date()?,
                unidades: 1.0,
            }],
        }],
    };
    let response = state
        .services
        .forecasting
        .forecast(&request)
        .map_err(|e| e.to_string())?;
    match response.forecasts.first() {
        Some(item) if item.forecast.len() == 1 => Ok(()),
        _ => Err("unexpected forecast shape".to_string()),
    }
}

fn check_pricing(state: &AppState) -> Result<(), String> {
    let request = PricingRequest {
        history_days: 1,
        target_margin: 0.0,
        productos: vec![PricingProduct {
            producto_id: 0,
            producto_nombre: None,
            precio_costo: 1.0,
            precio_actual: 1.0,
            rotacion_diaria: 0.0,
        }],
    };
    let response = state
        .services
        .pricing
        .recommend(&request)
        .map_err(|e| e.to_string())?;
    match response.recomendaciones.first() {
        Some(rec) if rec.precio_sugerido == 1.0 => Ok(()),
        _ => Err("unexpected pricing result".to_string()),
    }
}

/// Service status
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is running", body = StatusResponse)),
    tag = "health"
)]
pub async fn health_check() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "ok".to_string(),
    })
}

/// Basic liveness probe - just checks if the service is running
#[utoipa::path(
    get,
    path = "/health/live",
    responses((status = 200, description = "Process is alive")),
    tag = "health"
)]
pub async fn liveness_check() -> impl IntoResponse {
    Json(json!({
        "status": "up",
        "version": env!("CARGO_PKG_VERSION"),
        "uptime_secs": get_uptime_secs(),
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Readiness probe - runs each calculator on a fixed input
#[utoipa::path(
    get,
    path = "/health/ready",
    responses(
        (status = 200, description = "Ready to serve traffic", body = HealthResponse),
        (status = 503, description = "A component failed its check", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    let start = Instant::now();

    let details = HealthDetails {
        forecasting: check(|| check_forecasting(&state)),
        pricing: check(|| check_pricing(&state)),
        metrics: check(|| {
            METRICS.export_metrics();
            Ok(())
        }),
    };

    let all_up = [&details.forecasting, &details.pricing, &details.metrics]
        .iter()
        .all(|c| c.status == ComponentStatus::Up);
    let (status, status_code) = if all_up {
        (ComponentStatus::Up, StatusCode::OK)
    } else {
        (ComponentStatus::Down, StatusCode::SERVICE_UNAVAILABLE)
    };

    let response = HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        uptime_secs: get_uptime_secs(),
        details,
        response_time_ms: start.elapsed().as_millis() as u64,
    };

    (status_code, Json(response))
}

pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/health/live", get(liveness_check))
        .route("/health/ready", get(readiness_check))
}
