/*!
 * # Stock Coverage and Replenishment
 *
 * Combines the flat demand projection with on-hand stock to estimate how many
 * days the current inventory lasts and how many units should be ordered to
 * cover a target number of days.
 */

use crate::dto::{ReplenishmentItem, ReplenishmentRequest, ReplenishmentResponse, StockProduct};
use crate::ml::stats::{mean, non_negative, round_to};

/// Coverage reported for products with no demand.
pub const UNBOUNDED_COVERAGE_DAYS: f64 = 9999.0;

const DAILY_AVG_DECIMALS: u32 = 4;
const UNITS_DECIMALS: u32 = 2;
const DAYS_DECIMALS: u32 = 2;

/// Evaluates every product in the request, preserving input order.
pub fn plan(request: &ReplenishmentRequest) -> ReplenishmentResponse {
    let horizon = request.horizon_days.max(0) as f64;
    let target = request.stock_target_days.max(0) as f64;
    let window = request.history_days.map(|days| days.max(1) as f64);

    let productos = request
        .productos
        .iter()
        .map(|product| evaluate_product(product, horizon, target, window))
        .collect();

    ReplenishmentResponse { productos }
}

/// Coverage and restock suggestion for a single product.
///
/// With a `window_days` the daily average spreads total units over the whole
/// window, otherwise it is the mean of the submitted points.
pub fn evaluate_product(
    product: &StockProduct,
    horizon_days: f64,
    target_days: f64,
    window_days: Option<f64>,
) -> ReplenishmentItem {
    let units: Vec<f64> = product.history.iter().map(|p| non_negative(p.unidades)).collect();
    let daily_avg = match window_days {
        Some(days) => units.iter().sum::<f64>() / days.max(1.0),
        None => mean(&units),
    };
    let on_hand = non_negative(product.disponible);

    let coverage = if daily_avg > 0.0 {
        round_to(on_hand / daily_avg, DAYS_DECIMALS)
    } else {
        UNBOUNDED_COVERAGE_DAYS
    };

    let shortfall = non_negative(target_days * daily_avg - on_hand);
    let at_risk = daily_avg > 0.0 && on_hand / daily_avg < horizon_days;

    ReplenishmentItem {
        producto_id: product.producto_id,
        producto_nombre: product.producto_nombre.clone(),
        daily_avg: round_to(daily_avg, DAILY_AVG_DECIMALS),
        forecast_units: round_to(daily_avg * horizon_days, UNITS_DECIMALS),
        disponible: on_hand,
        cobertura_dias: coverage,
        sugerido_reponer: shortfall.ceil() as u64,
        en_riesgo: at_risk,
        dias_hasta_quiebre: at_risk.then_some(coverage),
    }
}
