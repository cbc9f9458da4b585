use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, instrument};

use super::RequestLimits;
use crate::{
    clock::Clock,
    dto::{ForecastRequest, ForecastResponse},
    errors::ServiceError,
    metrics::CALCULATION_METRICS,
    ml::forecasting,
};

/// Demand forecasting service
#[derive(Clone)]
pub struct ForecastingService {
    clock: Arc<dyn Clock>,
    limits: RequestLimits,
}

impl ForecastingService {
    pub fn new(clock: Arc<dyn Clock>, limits: RequestLimits) -> Self {
        Self { clock, limits }
    }

    fn check_limits(&self, request: &ForecastRequest) -> Result<(), ServiceError> {
        self.limits.check_horizon("horizon_days", request.horizon_days)?;
        self.limits.check_items("series", request.series.len())?;
        for (index, item) in request.series.iter().enumerate() {
            self.limits
                .check_items(&format!("series[{}].history", index), item.history.len())?;
        }
        Ok(())
    }

    /// Projects every series in the request
    #[instrument(skip(self, request), fields(series = request.series.len(), horizon_days = request.horizon_days))]
    pub fn forecast(&self, request: &ForecastRequest) -> Result<ForecastResponse, ServiceError> {
        self.check_limits(request)?;

        let started = Instant::now();
        let response = forecasting::forecast(request, self.clock.as_ref());
        CALCULATION_METRICS.record_forecast(response.forecasts.len(), started.elapsed());

        for item in &response.forecasts {
            debug!(
                producto_id = item.producto_id,
                daily_avg = item.daily_avg,
                "series projected"
            );
        }
        info!(series = response.forecasts.len(), "forecast computed");

        Ok(response)
    }
}
