// Calculation services
pub mod forecasting;
pub mod inventory_insights;
pub mod pricing;

pub use forecasting::ForecastingService;
pub use inventory_insights::InventoryInsightsService;
pub use pricing::PricingService;

use crate::{config::AppConfig, errors::ServiceError, metrics::CALCULATION_METRICS};

/// Optional size limits enforced before any calculation runs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestLimits {
    pub max_horizon_days: Option<i64>,
    pub max_items: Option<usize>,
}

impl RequestLimits {
    pub fn new(max_horizon_days: i64, max_items: usize) -> Self {
        Self {
            max_horizon_days: Some(max_horizon_days),
            max_items: Some(max_items),
        }
    }

    /// No horizon or item limit.
    pub fn unlimited() -> Self {
        Self::default()
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            max_horizon_days: config.max_horizon_days,
            max_items: config.max_series_items,
        }
    }

    pub fn check_horizon(&self, field: &str, days: i64) -> Result<(), ServiceError> {
        match self.max_horizon_days {
            Some(max) if days > max => {
                CALCULATION_METRICS.record_validation_failure();
                Err(ServiceError::validation(
                    field,
                    "max_horizon",
                    format!("must be at most {}", max),
                ))
            }
            _ => Ok(()),
        }
    }

    pub fn check_items(&self, field: &str, count: usize) -> Result<(), ServiceError> {
        match self.max_items {
            Some(max) if count > max => {
                CALCULATION_METRICS.record_validation_failure();
                Err(ServiceError::validation(
                    field,
                    "max_items",
                    format!("must contain at most {} items", max),
                ))
            }
            _ => Ok(()),
        }
    }
}
