/*!
 * # Calculation Module
 *
 * Pure calculators behind the HTTP endpoints. Every function here is total
 * over validated input: no I/O, no shared state, no error paths.
 *
 * - [`forecasting`]: flat demand projection from the historical daily mean
 * - [`pricing`]: cost-plus price suggestion with a rotation adjustment
 * - [`replenishment`]: stock coverage and restock suggestion
 * - [`anomaly_detection`]: z-score screening of daily totals
 */

pub mod anomaly_detection;
pub mod forecasting;
pub mod pricing;
pub mod replenishment;
pub mod stats;

pub use pricing::{PricingPolicy, RotationBand};
