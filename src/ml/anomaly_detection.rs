//! Z-score screening of daily totals.

use crate::dto::{AnomalyKind, AnomalyRequest, AnomalyResponse, DailyAnomaly};
use crate::ml::stats::{mean, population_std_dev, round_to};

const Z_DECIMALS: u32 = 2;
const SUMMARY_DECIMALS: u32 = 4;

/// Flags the points whose absolute z-score reaches `request.sigma`.
///
/// A flat or single-point series has zero deviation, every z-score is zero
/// and nothing is flagged. Flagged points keep their input order.
pub fn detect_anomalies(request: &AnomalyRequest) -> AnomalyResponse {
    let totals: Vec<f64> = request.puntos.iter().map(|p| p.total).collect();
    let m = mean(&totals);
    let s = population_std_dev(&totals);

    let anomalias = request
        .puntos
        .iter()
        .filter_map(|point| {
            let z = if s > 0.0 { (point.total - m) / s } else { 0.0 };
            (z.abs() >= request.sigma).then(|| DailyAnomaly {
                fecha: point.fecha,
                total: point.total,
                z: round_to(z, Z_DECIMALS),
                tipo: if z >= 0.0 { AnomalyKind::Alto } else { AnomalyKind::Bajo },
            })
        })
        .collect();

    AnomalyResponse {
        media: round_to(m, SUMMARY_DECIMALS),
        desviacion: round_to(s, SUMMARY_DECIMALS),
        anomalias,
    }
}
