#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{self, Body},
    http::{Method, Request},
    response::Response,
    Router,
};
use chrono::NaiveDate;
use serde_json::Value;
use stock_insights_api::{
    app_router, build_cors_layer, clock::FixedClock, config::AppConfig, logging, AppState,
};
use tower::ServiceExt;

/// Date reported by the test clock
pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 12, 30).unwrap()
}

/// Helper harness around the full router with a fixed clock.
pub struct TestApp {
    router: Router,
    pub state: AppState,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(AppConfig::new("127.0.0.1".into(), 18_080, "test".into()))
    }

    pub fn with_config(mut cfg: AppConfig) -> Self {
        cfg.cors_allow_any_origin = true;
        let cors = build_cors_layer(&cfg).expect("cors layer");
        let state = AppState::new(
            cfg,
            Arc::new(FixedClock::new(today())),
            logging::discard_logger(),
        );
        let router = app_router(state.clone(), cors);
        Self { router, state }
    }

    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);

        let body = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).expect("failed to serialize json request body"))
        } else {
            Body::empty()
        };

        self.send(builder.body(body).expect("failed to build request"))
            .await
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> Response {
        self.request(Method::POST, uri, Some(body)).await
    }

    pub async fn post_raw(&self, uri: &str, body: &str, content_type: Option<&str>) -> Response {
        let mut builder = Request::builder().method(Method::POST).uri(uri);
        if let Some(ct) = content_type {
            builder = builder.header("content-type", ct);
        }
        self.send(builder.body(Body::from(body.to_string())).expect("failed to build request"))
            .await
    }

    pub async fn send(&self, request: Request<Body>) -> Response {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }
}

pub async fn response_json(response: Response) -> Value {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body bytes");
    serde_json::from_slice(&bytes).expect("json response")
}
