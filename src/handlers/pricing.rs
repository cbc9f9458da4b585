use super::{common::ValidatedJson, AppState};
use crate::{
    dto::{PricingRequest, PricingResponse},
    errors::ServiceError,
};
use axum::{extract::State, routing::post, Json, Router};

/// Suggest prices from cost, target margin and rotation
#[utoipa::path(
    post,
    path = "/pricing",
    request_body = PricingRequest,
    responses(
        (status = 200, description = "One recommendation per product, in input order", body = PricingResponse),
        (status = 400, description = "Malformed JSON", body = crate::errors::ErrorResponse),
        (status = 415, description = "Missing JSON content type", body = crate::errors::ErrorResponse),
        (status = 422, description = "Request failed validation", body = crate::errors::ErrorResponse)
    ),
    tag = "pricing"
)]
pub async fn create_pricing(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<PricingRequest>,
) -> Result<Json<PricingResponse>, ServiceError> {
    let response = state.services.pricing.recommend(&payload)?;
    Ok(Json(response))
}

pub fn pricing_routes() -> Router<AppState> {
    Router::new().route("/pricing", post(create_pricing))
}
