use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

/// One observed day of demand for a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct HistoryPoint {
    #[schema(example = "2024-01-01")]
    pub fecha: NaiveDate,
    #[validate(range(min = 0.0))]
    #[schema(example = 12.0)]
    pub unidades: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct SeriesItem {
    pub producto_id: i64,
    pub producto_nombre: Option<String>,
    #[validate]
    pub history: Vec<HistoryPoint>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_projection_range"))]
pub struct ForecastRequest {
    /// Accepted for compatibility with the consumer; not used by the calculation.
    #[validate(range(min = 1))]
    #[schema(example = 90)]
    pub history_days: i64,
    #[validate(range(min = 1))]
    #[schema(example = 14)]
    pub horizon_days: i64,
    #[validate]
    pub series: Vec<SeriesItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ForecastPoint {
    pub fecha: NaiveDate,
    pub unidades: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ForecastResponseItem {
    pub producto_id: i64,
    pub producto_nombre: Option<String>,
    /// Mean of the observed units, rounded to 4 decimals.
    pub daily_avg: f64,
    pub forecast: Vec<ForecastPoint>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ForecastResponse {
    pub forecasts: Vec<ForecastResponseItem>,
}

/// Rejects horizons that would push a projected date past the calendar range.
fn validate_projection_range(request: &ForecastRequest) -> Result<(), ValidationError> {
    let Ok(horizon) = u64::try_from(request.horizon_days) else {
        return Ok(());
    };

    let overflows = request
        .series
        .iter()
        .filter_map(|item| item.history.iter().map(|p| p.fecha).max())
        .any(|last| last.checked_add_days(Days::new(horizon)).is_none());

    if overflows {
        let mut err = ValidationError::new("projection_out_of_range");
        err.message = Some("horizon_days projects past the supported calendar range".into());
        return Err(err);
    }
    Ok(())
}
