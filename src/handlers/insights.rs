use super::{common::ValidatedJson, AppState};
use crate::{
    dto::{AnomalyRequest, AnomalyResponse, ReplenishmentRequest, ReplenishmentResponse},
    errors::ServiceError,
};
use axum::{extract::State, routing::post, Json, Router};

/// Stock coverage and restock suggestion per product
#[utoipa::path(
    post,
    path = "/replenishment",
    request_body = ReplenishmentRequest,
    responses(
        (status = 200, description = "Coverage and restock suggestion per product", body = ReplenishmentResponse),
        (status = 400, description = "Malformed JSON", body = crate::errors::ErrorResponse),
        (status = 422, description = "Request failed validation", body = crate::errors::ErrorResponse)
    ),
    tag = "inventory"
)]
pub async fn create_replenishment(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<ReplenishmentRequest>,
) -> Result<Json<ReplenishmentResponse>, ServiceError> {
    let response = state.services.inventory_insights.replenishment(&payload)?;
    Ok(Json(response))
}

/// Flag unusual daily totals
#[utoipa::path(
    post,
    path = "/anomalies",
    request_body = AnomalyRequest,
    responses(
        (status = 200, description = "Days whose z-score reaches sigma", body = AnomalyResponse),
        (status = 400, description = "Malformed JSON", body = crate::errors::ErrorResponse),
        (status = 422, description = "Request failed validation", body = crate::errors::ErrorResponse)
    ),
    tag = "inventory"
)]
pub async fn create_anomalies(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<AnomalyRequest>,
) -> Result<Json<AnomalyResponse>, ServiceError> {
    let response = state.services.inventory_insights.anomalies(&payload)?;
    Ok(Json(response))
}

pub fn insights_routes() -> Router<AppState> {
    Router::new()
        .route("/replenishment", post(create_replenishment))
        .route("/anomalies", post(create_anomalies))
}
