use std::time::Instant;

use tracing::{info, instrument};

use super::RequestLimits;
use crate::{
    dto::{PricingRequest, PricingResponse},
    errors::ServiceError,
    metrics::CALCULATION_METRICS,
    ml::{pricing, PricingPolicy},
};

/// Price recommendation service
#[derive(Clone)]
pub struct PricingService {
    policy: PricingPolicy,
    limits: RequestLimits,
}

impl PricingService {
    pub fn new(policy: PricingPolicy, limits: RequestLimits) -> Self {
        Self { policy, limits }
    }

    pub fn policy(&self) -> &PricingPolicy {
        &self.policy
    }

    /// Recommends a price for every product in the request
    #[instrument(skip(self, request), fields(productos = request.productos.len(), target_margin = request.target_margin))]
    pub fn recommend(&self, request: &PricingRequest) -> Result<PricingResponse, ServiceError> {
        self.limits.check_items("productos", request.productos.len())?;

        let started = Instant::now();
        let response = pricing::recommend(request, &self.policy);

        let increases = response
            .recomendaciones
            .iter()
            .filter(|r| r.diferencia > 0.0)
            .count();
        let decreases = response
            .recomendaciones
            .iter()
            .filter(|r| r.diferencia < 0.0)
            .count();
        CALCULATION_METRICS.record_pricing(
            response.recomendaciones.len(),
            increases,
            decreases,
            started.elapsed(),
        );

        info!(
            recomendaciones = response.recomendaciones.len(),
            increases, decreases, "pricing computed"
        );

        Ok(response)
    }
}
