mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{response_json, TestApp};

#[tokio::test]
async fn forecast_projects_flat_mean() {
    let app = TestApp::new();

    let response = app
        .post_json(
            "/forecast",
            json!({
                "history_days": 30,
                "horizon_days": 2,
                "series": [{
                    "producto_id": 1,
                    "producto_nombre": "Leche",
                    "history": [
                        {"fecha": "2024-01-01", "unidades": 10},
                        {"fecha": "2024-01-02", "unidades": 20}
                    ]
                }]
            }),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(
        body,
        json!({
            "forecasts": [{
                "producto_id": 1,
                "producto_nombre": "Leche",
                "daily_avg": 15.0,
                "forecast": [
                    {"fecha": "2024-01-03", "unidades": 15.0},
                    {"fecha": "2024-01-04", "unidades": 15.0}
                ]
            }]
        })
    );
}

#[tokio::test]
async fn forecast_without_history_starts_after_today() {
    let app = TestApp::new();

    let response = app
        .post_json(
            "/forecast",
            json!({
                "history_days": 7,
                "horizon_days": 3,
                "series": [{"producto_id": 9, "history": []}]
            }),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    let item = &body["forecasts"][0];
    assert_eq!(item["daily_avg"], 0.0);
    assert!(item["producto_nombre"].is_null());
    assert_eq!(item["forecast"][0]["fecha"], "2024-12-31");
    assert_eq!(item["forecast"][2]["fecha"], "2025-01-02");
    assert!(item["forecast"]
        .as_array()
        .unwrap()
        .iter()
        .all(|p| p["unidades"] == 0.0));
}

#[tokio::test]
async fn forecast_with_no_series_returns_empty_list() {
    let app = TestApp::new();

    let response = app
        .post_json(
            "/forecast",
            json!({"history_days": 30, "horizon_days": 5, "series": []}),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response_json(response).await, json!({"forecasts": []}));
}

#[tokio::test]
async fn forecast_rejects_zero_horizon_with_field_details() {
    let app = TestApp::new();

    let response = app
        .post_json(
            "/forecast",
            json!({"history_days": 30, "horizon_days": 0, "series": []}),
        )
        .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = response_json(response).await;
    assert_eq!(body["error"], "Unprocessable Entity");
    assert_eq!(body["details"][0]["field"], "horizon_days");
    assert_eq!(body["details"][0]["code"], "range");
    assert!(body["request_id"].is_string());
}

#[tokio::test]
async fn forecast_rejects_negative_units_in_nested_history() {
    let app = TestApp::new();

    let response = app
        .post_json(
            "/forecast",
            json!({
                "history_days": 30,
                "horizon_days": 1,
                "series": [{
                    "producto_id": 1,
                    "history": [
                        {"fecha": "2024-01-01", "unidades": 1},
                        {"fecha": "2024-01-02", "unidades": -1}
                    ]
                }]
            }),
        )
        .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = response_json(response).await;
    assert_eq!(body["details"][0]["field"], "series[0].history[1].unidades");
}

#[tokio::test]
async fn forecast_rejects_missing_field_and_bad_types() {
    let app = TestApp::new();

    let missing = app
        .post_json("/forecast", json!({"history_days": 30, "series": []}))
        .await;
    assert_eq!(missing.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = response_json(missing).await;
    assert_eq!(body["details"][0]["field"], "horizon_days");
    assert_eq!(body["details"][0]["code"], "missing");

    let bad_date = app
        .post_json(
            "/forecast",
            json!({
                "history_days": 30,
                "horizon_days": 1,
                "series": [{"producto_id": 1, "history": [{"fecha": "01/02/2024", "unidades": 1}]}]
            }),
        )
        .await;
    assert_eq!(bad_date.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = response_json(bad_date).await;
    assert_eq!(body["details"][0]["field"], "series[0].history[0].fecha");
    assert_eq!(body["details"][0]["code"], "type");
}

#[tokio::test]
async fn forecast_rejects_malformed_json_and_wrong_content_type() {
    let app = TestApp::new();

    let malformed = app
        .post_raw("/forecast", "{\"history_days\": ", Some("application/json"))
        .await;
    assert_eq!(malformed.status(), StatusCode::BAD_REQUEST);
    let body = response_json(malformed).await;
    assert_eq!(body["error"], "Bad Request");

    let no_type = app
        .post_raw("/forecast", "{\"history_days\": 1}", None)
        .await;
    assert_eq!(no_type.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

#[tokio::test]
async fn forecast_rejects_horizon_above_configured_limit() {
    let mut cfg = stock_insights_api::config::AppConfig::new("127.0.0.1".into(), 0, "test".into());
    cfg.max_horizon_days = Some(30);
    let app = TestApp::with_config(cfg);

    let response = app
        .post_json(
            "/forecast",
            json!({"history_days": 30, "horizon_days": 31, "series": []}),
        )
        .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = response_json(response).await;
    assert_eq!(body["details"][0]["code"], "max_horizon");
}

#[tokio::test]
async fn forecast_rejects_projection_past_calendar_end() {
    let app = TestApp::new();

    let response = app
        .post_json(
            "/forecast",
            json!({
                "history_days": 30,
                "horizon_days": 10,
                "series": [{"producto_id": 1, "history": [{"fecha": "+262142-12-25", "unidades": 1}]}]
            }),
        )
        .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn forecast_accepts_long_horizon_by_default() {
    let app = TestApp::new();

    let response = app
        .post_json(
            "/forecast",
            json!({
                "history_days": 30,
                "horizon_days": 4000,
                "series": [{"producto_id": 1, "history": [{"fecha": "2024-01-01", "unidades": 2}]}]
            }),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    let points = body["forecasts"][0]["forecast"].as_array().unwrap();
    assert_eq!(points.len(), 4000);
    assert_eq!(points[3999]["fecha"], "2034-12-14");
}

#[tokio::test]
async fn forecast_daily_average_rounds_ties_to_even() {
    let app = TestApp::new();

    let response = app
        .post_json(
            "/forecast",
            json!({
                "history_days": 2,
                "horizon_days": 1,
                "series": [{"producto_id": 1, "history": [
                    {"fecha": "2024-01-01", "unidades": 0.0625},
                    {"fecha": "2024-01-02", "unidades": 0}
                ]}]
            }),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["forecasts"][0]["daily_avg"], 0.0312);
}
