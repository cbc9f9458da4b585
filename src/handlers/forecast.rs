use super::{common::ValidatedJson, AppState};
use crate::{
    dto::{ForecastRequest, ForecastResponse},
    errors::ServiceError,
};
use axum::{extract::State, routing::post, Json, Router};

/// Project daily demand per product
#[utoipa::path(
    post,
    path = "/forecast",
    request_body = ForecastRequest,
    responses(
        (status = 200, description = "Flat mean projection per product", body = ForecastResponse),
        (status = 400, description = "Malformed JSON", body = crate::errors::ErrorResponse),
        (status = 415, description = "Missing JSON content type", body = crate::errors::ErrorResponse),
        (status = 422, description = "Request failed validation", body = crate::errors::ErrorResponse)
    ),
    tag = "forecasting"
)]
pub async fn create_forecast(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<ForecastRequest>,
) -> Result<Json<ForecastResponse>, ServiceError> {
    let response = state.services.forecasting.forecast(&payload)?;
    Ok(Json(response))
}

pub fn forecast_routes() -> Router<AppState> {
    Router::new().route("/forecast", post(create_forecast))
}
