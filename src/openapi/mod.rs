use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Stock Insights API",
        version = "0.1.0",
        description = r#"
# Stock Insights API

Stateless calculations over sales history supplied by the caller.

## Features

- **Forecasting**: flat projection of the historical daily mean
- **Pricing**: cost-plus price suggestions adjusted by daily rotation
- **Replenishment**: stock coverage, stock-out risk and restock quantities
- **Anomalies**: z-score screening of daily totals

## Error Handling

Every error shares one body shape. Validation failures list each offending
field:

```json
{
  "error": "Unprocessable Entity",
  "message": "Validation error: horizon_days: must be at least 1",
  "details": [{"field": "horizon_days", "code": "range", "message": "must be at least 1"}],
  "request_id": "5b1f...",
  "timestamp": "2024-01-01T00:00:00+00:00"
}
```
        "#,
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development")
    ),
    tags(
        (name = "forecasting", description = "Demand projection"),
        (name = "pricing", description = "Price recommendations"),
        (name = "inventory", description = "Stock coverage and anomaly screening"),
        (name = "health", description = "Health check endpoints")
    ),
    paths(
        crate::handlers::forecast::create_forecast,
        crate::handlers::pricing::create_pricing,
        crate::handlers::insights::create_replenishment,
        crate::handlers::insights::create_anomalies,
        crate::handlers::health::health_check,
        crate::handlers::health::liveness_check,
        crate::handlers::health::readiness_check,
    ),
    components(
        schemas(
            // Forecasting
            crate::dto::HistoryPoint,
            crate::dto::SeriesItem,
            crate::dto::ForecastRequest,
            crate::dto::ForecastPoint,
            crate::dto::ForecastResponseItem,
            crate::dto::ForecastResponse,

            // Pricing
            crate::dto::PricingProduct,
            crate::dto::PricingRequest,
            crate::dto::PricingRecommendation,
            crate::dto::PricingResponse,

            // Inventory
            crate::dto::StockProduct,
            crate::dto::ReplenishmentRequest,
            crate::dto::ReplenishmentItem,
            crate::dto::ReplenishmentResponse,
            crate::dto::DailyTotal,
            crate::dto::AnomalyRequest,
            crate::dto::AnomalyKind,
            crate::dto::DailyAnomaly,
            crate::dto::AnomalyResponse,

            // Health
            crate::handlers::health::StatusResponse,
            crate::handlers::health::HealthResponse,

            // Error types
            crate::errors::ErrorResponse,
            crate::errors::FieldError
        )
    )
)]
pub struct ApiDocV1;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDocV1::openapi())
        .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_generation() {
        let openapi = ApiDocV1::openapi();
        let json = serde_json::to_string_pretty(&openapi).unwrap();
        assert!(json.contains("Stock Insights API"));
        assert!(json.contains("/forecast"));
        assert!(json.contains("/pricing"));
        assert!(json.contains("/replenishment"));
        assert!(json.contains("precio_sugerido"));
        assert!(json.contains("ErrorResponse"));
    }
}
