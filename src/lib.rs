//! Stock Insights API Library
//!
//! Stateless demand forecasting, pricing, replenishment and anomaly
//! calculations served over HTTP.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

// Core modules
pub mod clock;
pub mod config;
pub mod dto;
pub mod errors;
pub mod handlers;
pub mod logging;
pub mod metrics;
pub mod middleware_helpers;
pub mod ml;
pub mod openapi;
pub mod services;
pub mod tracing;

use axum::{extract::DefaultBodyLimit, http::HeaderValue, routing::get, Router};
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
};

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<config::AppConfig>,
    pub services: handlers::AppServices,
    pub logger: slog::Logger,
}

impl AppState {
    pub fn new(
        config: config::AppConfig,
        clock: Arc<dyn clock::Clock>,
        logger: slog::Logger,
    ) -> Self {
        let services = handlers::AppServices::new(&config, clock);
        Self {
            config: Arc::new(config),
            services,
            logger,
        }
    }
}

/// Calculation, health and metrics routes without any middleware
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(handlers::forecast::forecast_routes())
        .merge(handlers::pricing::pricing_routes())
        .merge(handlers::insights::insights_routes())
        .merge(handlers::health::health_routes())
        .route("/metrics", get(metrics::metrics_handler))
        .route("/metrics/json", get(metrics::metrics_json_handler))
}

/// Builds the full application router with its middleware stack
///
/// Layers from the outside in: request id, CORS, timeout, compression,
/// HTTP trace span, access log, body size limit.
pub fn app_router(state: AppState, cors: CorsLayer) -> Router {
    let config = state.config.clone();
    let logging_state = Arc::new(logging::LoggingState::new(state.logger.clone()));

    api_routes()
        .merge(openapi::swagger_ui())
        .layer(DefaultBodyLimit::max(config.max_body_size))
        .layer(axum::middleware::from_fn_with_state(
            logging_state,
            logging::logging_middleware,
        ))
        // HTTP tracing layer for consistent request/response telemetry
        .layer(crate::tracing::configure_http_tracing())
        // Apply compression and timeouts
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(config.request_timeout()))
        .layer(cors)
        // Ensure every request carries a request id for traceability
        .layer(axum::middleware::from_fn(
            middleware_helpers::request_id::request_id_middleware,
        ))
        .with_state(state)
}

/// Builds the CORS layer from configuration
pub fn build_cors_layer(cfg: &config::AppConfig) -> anyhow::Result<CorsLayer> {
    let origins: Vec<HeaderValue> = cfg
        .cors_origins()
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    if !origins.is_empty() {
        return Ok(CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any));
    }

    if cfg.should_allow_permissive_cors() {
        ::tracing::info!(
            "Using permissive CORS because explicit origins were not configured ({})",
            if cfg.is_development() {
                "development environment"
            } else {
                "explicit override enabled"
            }
        );
        return Ok(CorsLayer::permissive());
    }

    anyhow::bail!(
        "Missing CORS configuration: set APP__CORS_ALLOWED_ORIGINS or APP__CORS_ALLOW_ANY_ORIGIN=true"
    )
}

#[cfg(test)]
mod cors_tests {
    use super::*;

    #[test]
    fn production_without_origins_is_rejected() {
        let cfg = config::AppConfig::new("127.0.0.1".into(), 8080, "production".into());
        assert!(build_cors_layer(&cfg).is_err());
    }

    #[test]
    fn explicit_origins_or_development_are_accepted() {
        let mut cfg = config::AppConfig::new("127.0.0.1".into(), 8080, "production".into());
        cfg.cors_allowed_origins = Some("https://shop.example.com".into());
        assert!(build_cors_layer(&cfg).is_ok());

        let dev = config::AppConfig::new("127.0.0.1".into(), 8080, "development".into());
        assert!(build_cors_layer(&dev).is_ok());
    }
}
