use super::forecast::HistoryPoint;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

const DEFAULT_STOCK_TARGET_DAYS: i64 = 30;
const DEFAULT_SIGMA: f64 = 3.0;

fn default_stock_target_days() -> i64 {
    DEFAULT_STOCK_TARGET_DAYS
}

fn default_sigma() -> f64 {
    DEFAULT_SIGMA
}

fn validate_positive(value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        let mut err = ValidationError::new("range");
        err.message = Some("must be greater than 0".into());
        Err(err)
    }
}

// ---------------------------------------------------------------------------
// Replenishment
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct StockProduct {
    pub producto_id: i64,
    pub producto_nombre: Option<String>,
    /// Units currently on hand.
    #[validate(range(min = 0.0))]
    pub disponible: f64,
    #[serde(default)]
    #[validate]
    pub history: Vec<HistoryPoint>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct ReplenishmentRequest {
    /// Days ahead used for the demand projection and the stock-out check.
    #[validate(range(min = 1))]
    #[schema(example = 14)]
    pub horizon_days: i64,
    /// Days of demand the restock suggestion should cover.
    #[serde(default = "default_stock_target_days")]
    #[validate(range(min = 1))]
    #[schema(example = 30)]
    pub stock_target_days: i64,
    /// Length of the sales window the history covers. When set, the daily
    /// average is total units over this many days, so days without a history
    /// point count as zero sales. When unset it is the mean of the points.
    #[serde(default)]
    #[validate(range(min = 1))]
    #[schema(example = 90)]
    pub history_days: Option<i64>,
    #[validate]
    pub productos: Vec<StockProduct>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReplenishmentItem {
    pub producto_id: i64,
    pub producto_nombre: Option<String>,
    pub daily_avg: f64,
    pub forecast_units: f64,
    pub disponible: f64,
    pub cobertura_dias: f64,
    pub sugerido_reponer: u64,
    pub en_riesgo: bool,
    pub dias_hasta_quiebre: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReplenishmentResponse {
    pub productos: Vec<ReplenishmentItem>,
}

// ---------------------------------------------------------------------------
// Anomalies
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DailyTotal {
    pub fecha: NaiveDate,
    pub total: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct AnomalyRequest {
    /// Minimum absolute z-score reported as an anomaly.
    #[serde(default = "default_sigma")]
    #[validate(custom = "validate_positive")]
    #[schema(example = 3.0)]
    pub sigma: f64,
    pub puntos: Vec<DailyTotal>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AnomalyKind {
    Alto,
    Bajo,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DailyAnomaly {
    pub fecha: NaiveDate,
    pub total: f64,
    pub z: f64,
    pub tipo: AnomalyKind,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AnomalyResponse {
    pub media: f64,
    pub desviacion: f64,
    pub anomalias: Vec<DailyAnomaly>,
}
