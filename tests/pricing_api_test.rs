mod common;

use axum::http::StatusCode;
use serde_json::{json, Value};

use common::{response_json, TestApp};
use stock_insights_api::config::AppConfig;

fn product(id: i64, cost: f64, current: f64, rotation: f64) -> Value {
    json!({
        "producto_id": id,
        "producto_nombre": format!("Producto {}", id),
        "precio_costo": cost,
        "precio_actual": current,
        "rotacion_diaria": rotation
    })
}

async fn recommend(app: &TestApp, margin: f64, products: Vec<Value>) -> Value {
    let response = app
        .post_json(
            "/pricing",
            json!({"history_days": 90, "target_margin": margin, "productos": products}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    response_json(response).await
}

#[tokio::test]
async fn fast_mover_price_goes_up() {
    let app = TestApp::new();

    let body = recommend(&app, 0.2, vec![product(1, 80.0, 90.0, 0.6)]).await;

    assert_eq!(
        body["recomendaciones"][0],
        json!({
            "producto_id": 1,
            "producto_nombre": "Producto 1",
            "precio_sugerido": 100.8,
            "diferencia": 10.8,
            "margen_estimado": 0.206,
            "rotacion_diaria": 0.6
        })
    );
}

#[tokio::test]
async fn threshold_boundaries_are_inclusive() {
    let app = TestApp::new();

    let body = recommend(
        &app,
        0.3,
        vec![product(1, 100.0, 0.0, 0.5), product(2, 100.0, 0.0, 0.05)],
    )
    .await;

    assert_eq!(body["recomendaciones"][0]["precio_sugerido"], 136.5);
    assert_eq!(body["recomendaciones"][1]["precio_sugerido"], 123.5);
}

#[tokio::test]
async fn zero_cost_keeps_current_price_for_any_rotation() {
    let app = TestApp::new();

    let body = recommend(
        &app,
        0.3,
        vec![
            product(1, 0.0, 50.0, 0.0),
            product(2, 0.0, 50.0, 0.01),
            product(3, 0.0, 50.0, 2.0),
        ],
    )
    .await;

    for rec in body["recomendaciones"].as_array().unwrap() {
        assert_eq!(rec["precio_sugerido"], 50.0);
        assert_eq!(rec["diferencia"], 0.0);
    }
}

#[tokio::test]
async fn zero_suggestion_serializes_null_margin() {
    let app = TestApp::new();

    let body = recommend(&app, 0.3, vec![product(1, 0.0, 0.0, 0.0)]).await;

    let rec = &body["recomendaciones"][0];
    assert_eq!(rec["precio_sugerido"], 0.0);
    assert!(rec["margen_estimado"].is_null());
}

#[tokio::test]
async fn recommendations_keep_input_order() {
    let app = TestApp::new();

    let body = recommend(
        &app,
        0.1,
        vec![
            product(30, 1.0, 1.0, 0.1),
            product(10, 2.0, 1.0, 0.1),
            product(20, 3.0, 1.0, 0.1),
        ],
    )
    .await;

    let ids: Vec<i64> = body["recomendaciones"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["producto_id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![30, 10, 20]);
}

#[tokio::test]
async fn configured_policy_changes_thresholds() {
    let mut cfg = AppConfig::new("127.0.0.1".into(), 0, "test".into());
    cfg.pricing.rotation_high = 1.0;
    let app = TestApp::with_config(cfg);

    let body = recommend(&app, 0.0, vec![product(1, 100.0, 100.0, 0.6)]).await;

    assert_eq!(body["recomendaciones"][0]["precio_sugerido"], 100.0);
}

#[tokio::test]
async fn pricing_rejects_negative_inputs() {
    let app = TestApp::new();

    let response = app
        .post_json(
            "/pricing",
            json!({
                "history_days": 90,
                "target_margin": -0.1,
                "productos": [product(1, -1.0, 10.0, 0.1)]
            }),
        )
        .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = response_json(response).await;
    let fields: Vec<&str> = body["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["productos[0].precio_costo", "target_margin"]);
}

#[tokio::test]
async fn pricing_rejects_zero_history_days() {
    let app = TestApp::new();

    let response = app
        .post_json(
            "/pricing",
            json!({"history_days": 0, "target_margin": 0.3, "productos": []}),
        )
        .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn suggested_price_rounds_ties_to_even() {
    let app = TestApp::new();

    let body = recommend(&app, 0.0, vec![product(1, 10.125, 10.0, 0.2)]).await;

    assert_eq!(body["recomendaciones"][0]["precio_sugerido"], 10.12);
    assert_eq!(body["recomendaciones"][0]["diferencia"], 0.12);
}

#[tokio::test]
async fn history_days_accepts_values_beyond_32_bits() {
    let app = TestApp::new();

    let response = app
        .post_json(
            "/pricing",
            json!({"history_days": 3_000_000_000i64, "target_margin": 0.2, "productos": []}),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn missing_product_id_is_reported_with_its_path() {
    let app = TestApp::new();

    let response = app
        .post_json(
            "/pricing",
            json!({
                "history_days": 30,
                "target_margin": 0.2,
                "productos": [{"precio_costo": 1, "precio_actual": 2, "rotacion_diaria": 0.1}]
            }),
        )
        .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = response_json(response).await;
    assert_eq!(body["details"][0]["field"], "productos[0].producto_id");
    assert_eq!(body["details"][0]["code"], "missing");
}

#[tokio::test]
async fn wrong_type_is_reported_with_its_path() {
    let app = TestApp::new();

    let response = app
        .post_json(
            "/pricing",
            json!({
                "history_days": 30,
                "target_margin": "high",
                "productos": []
            }),
        )
        .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = response_json(response).await;
    assert_eq!(body["details"][0]["field"], "target_margin");
    assert_eq!(body["details"][0]["code"], "type");
}
