//! Wire types for the calculation endpoints.
//!
//! Field names follow the consuming inventory application's JSON keys and must
//! not be renamed.

pub mod forecast;
pub mod insights;
pub mod pricing;

pub use forecast::{
    ForecastPoint, ForecastRequest, ForecastResponse, ForecastResponseItem, HistoryPoint,
    SeriesItem,
};
pub use insights::{
    AnomalyKind, AnomalyRequest, AnomalyResponse, DailyAnomaly, DailyTotal, ReplenishmentItem,
    ReplenishmentRequest, ReplenishmentResponse, StockProduct,
};
pub use pricing::{PricingProduct, PricingRecommendation, PricingRequest, PricingResponse};
