/*!
 * # Pricing Recommendations
 *
 * Cost-plus pricing nudged by sell-through speed. The base price is cost
 * marked up by the target margin; fast movers get a small increase and slow
 * movers a small discount. Products with no known cost keep their current
 * price untouched.
 */

use crate::dto::{PricingProduct, PricingRecommendation, PricingRequest, PricingResponse};
use crate::ml::stats::{non_negative, round_to};
use serde::{Deserialize, Serialize};

pub const DEFAULT_ROTATION_LOW: f64 = 0.05;
pub const DEFAULT_ROTATION_HIGH: f64 = 0.5;
pub const DEFAULT_ADJUST_UP: f64 = 0.05;
pub const DEFAULT_ADJUST_DOWN: f64 = 0.05;

/// Floor for the slow-mover multiplier; keeps suggestions strictly positive.
const MIN_DOWN_MULTIPLIER: f64 = 0.01;

const PRICE_DECIMALS: u32 = 2;
const MARGIN_DECIMALS: u32 = 3;

/// Rotation thresholds and the adjustments applied at each end.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricingPolicy {
    /// Rotations in `(0, rotation_low]` are slow movers.
    pub rotation_low: f64,
    /// Rotations at or above this are fast movers.
    pub rotation_high: f64,
    pub adjust_up: f64,
    pub adjust_down: f64,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            rotation_low: DEFAULT_ROTATION_LOW,
            rotation_high: DEFAULT_ROTATION_HIGH,
            adjust_up: DEFAULT_ADJUST_UP,
            adjust_down: DEFAULT_ADJUST_DOWN,
        }
    }
}

/// Sell-through classification driving the price adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationBand {
    Fast,
    Slow,
    Neutral,
}

impl PricingPolicy {
    /// Classifies a daily rotation. Checks run in order and the first match
    /// wins, so `rotation_high` is inclusive for `Fast` and `rotation_low` is
    /// inclusive for `Slow`.
    pub fn classify(&self, rotation: f64) -> RotationBand {
        if rotation >= self.rotation_high {
            RotationBand::Fast
        } else if rotation > 0.0 && rotation <= self.rotation_low {
            RotationBand::Slow
        } else {
            RotationBand::Neutral
        }
    }

    /// Price multiplier for a band.
    pub fn multiplier(&self, band: RotationBand) -> f64 {
        match band {
            RotationBand::Fast => 1.0 + self.adjust_up,
            RotationBand::Slow => (1.0 - self.adjust_down).max(MIN_DOWN_MULTIPLIER),
            RotationBand::Neutral => 1.0,
        }
    }
}

/// Builds one recommendation per product, preserving input order.
///
/// `history_days` is carried by the request for the consumer's benefit and
/// does not influence the result.
pub fn recommend(request: &PricingRequest, policy: &PricingPolicy) -> PricingResponse {
    let recomendaciones = request
        .productos
        .iter()
        .map(|product| recommend_product(product, request.target_margin, policy))
        .collect();

    PricingResponse { recomendaciones }
}

/// Prices a single product.
pub fn recommend_product(
    product: &PricingProduct,
    target_margin: f64,
    policy: &PricingPolicy,
) -> PricingRecommendation {
    let cost = non_negative(product.precio_costo);
    let current = non_negative(product.precio_actual);
    let rotation = non_negative(product.rotacion_diaria);

    let base = if cost > 0.0 {
        cost * (1.0 + target_margin) * policy.multiplier(policy.classify(rotation))
    } else {
        current
    };

    let suggested = round_to(base, PRICE_DECIMALS);
    let difference = round_to(suggested - current, PRICE_DECIMALS);
    let margin = (suggested > 0.0).then(|| round_to((suggested - cost) / suggested, MARGIN_DECIMALS));

    PricingRecommendation {
        producto_id: product.producto_id,
        producto_nombre: product.producto_nombre.clone(),
        precio_sugerido: suggested,
        diferencia: difference,
        margen_estimado: margin,
        rotacion_diaria: rotation,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn product(cost: f64, current: f64, rotation: f64) -> PricingProduct {
        PricingProduct {
            producto_id: 1,
            producto_nombre: Some("Aceite".to_string()),
            precio_costo: cost,
            precio_actual: current,
            rotacion_diaria: rotation,
        }
    }

    #[rstest]
    #[case(0.0, RotationBand::Neutral)]
    #[case(0.01, RotationBand::Slow)]
    #[case(0.05, RotationBand::Slow)]
    #[case(0.050001, RotationBand::Neutral)]
    #[case(0.49, RotationBand::Neutral)]
    #[case(0.5, RotationBand::Fast)]
    #[case(12.0, RotationBand::Fast)]
    fn classifies_rotation_bands(#[case] rotation: f64, #[case] expected: RotationBand) {
        assert_eq!(PricingPolicy::default().classify(rotation), expected);
    }

    #[test]
    fn fast_mover_gets_price_increase() {
        let rec = recommend_product(&product(80.0, 90.0, 0.6), 0.2, &PricingPolicy::default());
        assert_eq!(rec.precio_sugerido, 100.8);
        assert_eq!(rec.diferencia, 10.8);
        assert_eq!(rec.margen_estimado, Some(0.206));
        assert_eq!(rec.rotacion_diaria, 0.6);
    }

    #[test]
    fn high_threshold_is_inclusive() {
        let rec = recommend_product(&product(100.0, 0.0, 0.5), 0.0, &PricingPolicy::default());
        assert_eq!(rec.precio_sugerido, 105.0);
    }

    #[test]
    fn low_threshold_is_inclusive() {
        let rec = recommend_product(&product(100.0, 0.0, 0.05), 0.3, &PricingPolicy::default());
        assert_eq!(rec.precio_sugerido, 123.5);
    }

    #[test]
    fn neutral_rotation_keeps_cost_plus_price() {
        let rec = recommend_product(&product(50.0, 60.0, 0.2), 0.3, &PricingPolicy::default());
        assert_eq!(rec.precio_sugerido, 65.0);
        assert_eq!(rec.diferencia, 5.0);
        assert_eq!(rec.margen_estimado, Some(0.231));
    }

    #[rstest]
    #[case(0.0)]
    #[case(0.03)]
    #[case(0.2)]
    #[case(0.9)]
    fn zero_cost_keeps_current_price(#[case] rotation: f64) {
        let rec = recommend_product(&product(0.0, 50.0, rotation), 0.4, &PricingPolicy::default());
        assert_eq!(rec.precio_sugerido, 50.0);
        assert_eq!(rec.diferencia, 0.0);
        assert_eq!(rec.margen_estimado, Some(1.0));
    }

    #[test]
    fn zero_suggestion_has_no_margin() {
        let rec = recommend_product(&product(0.0, 0.0, 1.0), 0.3, &PricingPolicy::default());
        assert_eq!(rec.precio_sugerido, 0.0);
        assert_eq!(rec.margen_estimado, None);
    }

    #[test]
    fn slow_multiplier_is_floored() {
        let policy = PricingPolicy {
            adjust_down: 1.5,
            ..PricingPolicy::default()
        };
        assert_eq!(policy.multiplier(RotationBand::Slow), 0.01);
        let rec = recommend_product(&product(100.0, 10.0, 0.01), 0.0, &policy);
        assert_eq!(rec.precio_sugerido, 1.0);
    }

    #[test]
    fn negative_inputs_are_clamped() {
        let rec = recommend_product(&product(-10.0, -5.0, -1.0), 0.3, &PricingPolicy::default());
        assert_eq!(rec.precio_sugerido, 0.0);
        assert_eq!(rec.diferencia, 0.0);
        assert_eq!(rec.rotacion_diaria, 0.0);
    }

    #[test]
    fn preserves_product_order() {
        let request = PricingRequest {
            history_days: 90,
            target_margin: 0.1,
            productos: vec![
                PricingProduct { producto_id: 3, ..product(10.0, 10.0, 0.0) },
                PricingProduct { producto_id: 1, ..product(20.0, 10.0, 0.0) },
                PricingProduct { producto_id: 2, ..product(30.0, 10.0, 0.0) },
            ],
        };
        let response = recommend(&request, &PricingPolicy::default());
        let ids: Vec<i64> = response.recomendaciones.iter().map(|r| r.producto_id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }
}
