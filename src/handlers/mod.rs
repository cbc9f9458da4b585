pub mod common;
pub mod forecast;
pub mod health;
pub mod insights;
pub mod pricing;

use crate::{
    clock::Clock,
    config::AppConfig,
    services::{ForecastingService, InventoryInsightsService, PricingService, RequestLimits},
};
use std::sync::Arc;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates the calculations used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub forecasting: Arc<ForecastingService>,
    pub pricing: Arc<PricingService>,
    pub inventory_insights: Arc<InventoryInsightsService>,
}

impl AppServices {
    /// Builds every service from configuration, sharing one clock
    pub fn new(config: &AppConfig, clock: Arc<dyn Clock>) -> Self {
        let limits = RequestLimits::from_config(config);

        Self {
            forecasting: Arc::new(ForecastingService::new(clock, limits)),
            pricing: Arc::new(PricingService::new(config.pricing_policy(), limits)),
            inventory_insights: Arc::new(InventoryInsightsService::new(limits)),
        }
    }
}
