use std::time::Instant;

use tracing::{info, instrument, warn};

use super::RequestLimits;
use crate::{
    dto::{AnomalyRequest, AnomalyResponse, ReplenishmentRequest, ReplenishmentResponse},
    errors::ServiceError,
    metrics::CALCULATION_METRICS,
    ml::{anomaly_detection, replenishment},
};

/// Stock coverage and daily anomaly screening
#[derive(Clone)]
pub struct InventoryInsightsService {
    limits: RequestLimits,
}

impl InventoryInsightsService {
    pub fn new(limits: RequestLimits) -> Self {
        Self { limits }
    }

    /// Coverage, stock-out risk and restock suggestion per product
    #[instrument(skip(self, request), fields(productos = request.productos.len(), horizon_days = request.horizon_days))]
    pub fn replenishment(
        &self,
        request: &ReplenishmentRequest,
    ) -> Result<ReplenishmentResponse, ServiceError> {
        self.limits.check_horizon("horizon_days", request.horizon_days)?;
        self.limits.check_horizon("stock_target_days", request.stock_target_days)?;
        self.limits.check_items("productos", request.productos.len())?;
        for (index, product) in request.productos.iter().enumerate() {
            self.limits
                .check_items(&format!("productos[{}].history", index), product.history.len())?;
        }

        let started = Instant::now();
        let response = replenishment::plan(request);

        let at_risk: Vec<i64> = response
            .productos
            .iter()
            .filter(|p| p.en_riesgo)
            .map(|p| p.producto_id)
            .collect();
        CALCULATION_METRICS.record_replenishment(
            response.productos.len(),
            at_risk.len(),
            started.elapsed(),
        );

        if !at_risk.is_empty() {
            warn!(productos = ?at_risk, "products at risk of stock-out");
        }
        info!(productos = response.productos.len(), "replenishment computed");

        Ok(response)
    }

    /// Flags daily totals that deviate from the mean by at least `sigma`
    #[instrument(skip(self, request), fields(puntos = request.puntos.len(), sigma = request.sigma))]
    pub fn anomalies(&self, request: &AnomalyRequest) -> Result<AnomalyResponse, ServiceError> {
        self.limits.check_items("puntos", request.puntos.len())?;

        let started = Instant::now();
        let response = anomaly_detection::detect_anomalies(request);
        CALCULATION_METRICS.record_anomaly_check(response.anomalias.len(), started.elapsed());

        info!(
            anomalias = response.anomalias.len(),
            media = response.media,
            desviacion = response.desviacion,
            "anomaly screening computed"
        );

        Ok(response)
    }
}
